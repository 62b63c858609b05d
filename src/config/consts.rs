// src/config/consts.rs

// Source page
pub const SOURCE_URL: &str = "https://toronto.citynews.ca/toronto-gta-gas-prices/";
pub const USER_AGENT: &str = concat!("gas_scrape/", env!("CARGO_PKG_VERSION"));
pub const FETCH_TIMEOUT_SECS: u64 = 60;

// Local files
pub const DATA_FILE: &str = "gas_prices.json";
pub const CONFIG_FILE: &str = "gas_scrape.toml";
pub const DEBUG_DIR: &str = "debug_artifacts";
pub const PAGE_DUMP_FILE: &str = "page_content.html";
pub const ENV_PREFIX: &str = "GAS_SCRAPE";

// Page markers (see extract/)
pub const CARD_CLASS: &str = "price-card";
pub const PRICES_CONTAINER: &str = "gas-prices";
pub const PROSE_SECTION: &str = "entry-content";
pub const TOMORROW_TOKEN: &str = "tomorrow";
pub const PRICE_HEADING: &str = "h2";

// Units
pub const CENT_SIGN: char = '¢';
/// "¢" (C2 A2) decoded as Latin-1 upstream
pub const CENT_SIGN_MOJIBAKE: &str = "Â¢";
