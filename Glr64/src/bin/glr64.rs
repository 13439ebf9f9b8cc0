fn main() -> anyhow::Result<()> {
    glr64::cli::run_cli()
}
