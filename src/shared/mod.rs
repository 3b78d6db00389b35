pub mod clock;
pub mod constants;
pub mod patch;
pub mod tree;
pub mod types;
pub mod validation;

#[cfg(test)]
pub mod test_helpers;
