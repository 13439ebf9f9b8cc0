//! Binary capture formats
//!
//! - [`glr`] - `GLideN64` ripper captures of per-triangle RDP state

pub mod glr;
