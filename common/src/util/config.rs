use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub synthesis: SynthesisConfig,
    #[serde(default)]
    pub input: InputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            synthesis: SynthesisConfig::default(),
            input: InputConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SynthesisConfig {
    /// Side of the core square components are sampled into.
    #[serde(default = "default_n_grid_spaces")]
    pub n_grid_spaces: u32,
    /// Extra border reserved for routing slack; the routed grid is
    /// `(n_grid_spaces + padding)` on a side.
    #[serde(default = "default_padding")]
    pub padding: u32,
    #[serde(default = "default_max_iters")]
    pub max_iters: usize,
    /// Stop as soon as the best layout reaches this score.
    #[serde(default = "default_target_score")]
    pub target_score: f64,
    #[serde(default = "default_area_weight")]
    pub area_weight: f64,
    #[serde(default = "default_length_weight")]
    pub length_weight: f64,
    /// Resample budget per component inside one placement attempt.
    #[serde(default = "default_max_place_attempts")]
    pub max_place_attempts: usize,
    /// Fixed RNG seed for reproducible runs; random when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            n_grid_spaces: default_n_grid_spaces(),
            padding: default_padding(),
            max_iters: default_max_iters(),
            target_score: default_target_score(),
            area_weight: default_area_weight(),
            length_weight: default_length_weight(),
            max_place_attempts: default_max_place_attempts(),
            seed: None,
        }
    }
}

impl SynthesisConfig {
    /// Full routed grid side: core plus the padding border.
    pub fn grid_dims(&self) -> u32 {
        self.n_grid_spaces + self.padding
    }
}

#[derive(Debug, Deserialize)]
pub struct InputConfig {
    #[serde(default = "default_design_file")]
    pub design_file: String,
    #[serde(default = "default_output_file")]
    pub output_file: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            design_file: default_design_file(),
            output_file: default_output_file(),
        }
    }
}

fn default_n_grid_spaces() -> u32 {
    8
}

fn default_padding() -> u32 {
    4
}

fn default_max_iters() -> usize {
    500
}

fn default_target_score() -> f64 {
    0.95
}

fn default_area_weight() -> f64 {
    0.5
}

fn default_length_weight() -> f64 {
    0.5
}

fn default_max_place_attempts() -> usize {
    100
}

fn default_design_file() -> String {
    "inputs/design.json".to_string()
}

fn default_output_file() -> String {
    "output/layout.json".to_string()
}
