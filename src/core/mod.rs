pub mod backup;
pub mod infrastructure;
pub mod retention;
pub mod schedule;
pub mod system;
#[cfg(test)]
pub mod test_support;
