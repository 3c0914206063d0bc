//! Configuration access port trait.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
    fn get_double(&self, section: &str, key: &str, default: f64) -> f64;
    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool;

    /// Window lengths and counts. Negative values read as 0 so that
    /// validation reports them instead of wrapping.
    fn get_usize(&self, section: &str, key: &str, default: usize) -> usize {
        self.get_int(section, key, default as i64).max(0) as usize
    }
}
