/// Number of hex characters of the SHA-256 digest kept in artifact filenames.
pub const ARTIFACT_HASH_PREFIX_LEN: usize = 8;

/// Message domain used for every translated service-worker string.
pub const TRANSLATION_DOMAIN: &str = "pwa";

/// Environment variable overriding the default configuration file.
pub const CONFIG_ENV_VAR: &str = "PWAGEN_CONFIG";

pub const DEFAULT_CONFIG_FILE: &str = "pwa.yaml";
pub const DEFAULT_PUBLIC_FOLDER: &str = "public";
pub const DEFAULT_ASSET_FOLDER: &str = "/pwa";
pub const DEFAULT_OUTPUT_FILE: &str = "/pwa.json";
pub const DEFAULT_CACHE_NAME: &str = "bg-fetch";

pub const DEFAULT_ICON_SIZES: [u32; 9] = [16, 32, 48, 96, 144, 180, 256, 512, 1024];
