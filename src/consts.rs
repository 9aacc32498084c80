pub const EPSILON: f64 = 1e-10;
pub const MIN_POINTS: usize = 2;
pub const CONFIG_FILE: &str = "tabconfig.ini";
use ini::Ini;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use tracing::level_filters::LevelFilter;
#[derive(Debug, Clone, PartialEq)]
pub struct DemoConfig {
    pub left_x: f64,
    pub right_x: f64,
    pub points_count: usize,
    pub sample_steps: usize,
    pub log_level: LevelFilter,
}
pub static DEMO_CONFIG: Lazy<DemoConfig> = Lazy::new(|| load_demo_config(CONFIG_FILE));
pub fn load_demo_config(path: &str) -> DemoConfig {
    let ini = match Ini::load_from_file(path) {
        Ok(ini) => ini,
        Err(_) => return DemoConfig::default(),
    };
    let default_section: HashMap<String, String> = ini
        .section(None::<String>)
        .map(|props| props.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect())
        .unwrap_or_default();
    let defaults = DemoConfig::default();
    DemoConfig {
        left_x: default_section
            .get("left_x")
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.left_x),
        right_x: default_section
            .get("right_x")
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.right_x),
        points_count: default_section
            .get("points_count")
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.points_count),
        sample_steps: default_section
            .get("sample_steps")
            .and_then(|s| s.parse().ok())
            .filter(|&n: &usize| n > 0)
            .unwrap_or(defaults.sample_steps),
        log_level: default_section
            .get("log_level")
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.log_level),
    }
}
impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            left_x: 0.0,
            right_x: 10.0,
            points_count: 5,
            sample_steps: 4,
            log_level: LevelFilter::INFO,
        }
    }
}
