#[cfg(feature = "debt")]
pub mod debt;

#[cfg(feature = "depreciation")]
pub mod depreciation;
