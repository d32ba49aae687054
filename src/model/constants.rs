// Rating constants
pub const STARTING_RATING: f64 = 1500.0;
pub const DEFAULT_SIGMA: f64 = STARTING_RATING / 3.0;
/// Politicians whose uncertainty exceeds this are hidden from the public ranking
pub const MAX_SIGMA: f64 = STARTING_RATING / 3.0 / 2.0;
pub const BETA: f64 = STARTING_RATING / 3.0 / 2.0;
pub const KAPPA: f64 = 0.0001;

// Ranking constants
pub const YEARS_UNTIL_EXCLUDED: i32 = 8;
pub const SNAPSHOT_LOOKBACK_MONTHS: u32 = 24;

// Ticket constants
pub const NEGLIGIBLE_VOTE_SHARE: f64 = 0.01;
pub const PRESIDENTIAL_OFFICE_MARKER: &str = "US President";

// Metadata constants
pub const FIRST_METADATA_YEAR: i32 = 1992;
pub const METADATA_CYCLE_YEARS: usize = 4;
