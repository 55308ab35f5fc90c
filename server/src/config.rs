use std::path::PathBuf;

pub const DEFAULT_SERVER_PORT: u16 = 3000;
pub const DEFAULT_UNITS_PATH: &str = "data/units.json";
pub const DEFAULT_TERRITORIES_PATH: &str = "data/territories.json";
pub const DEFAULT_CLIENT_DIST_DIR: &str = "client/dist";

/// Cache lifetime of the map payload. The payload only changes on restart.
pub const MAP_CACHE_CONTROL: &str = "public, max-age=300";

pub fn server_port() -> u16 {
    std::env::var("SERVER_PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_SERVER_PORT)
}

pub fn units_path() -> PathBuf {
    path_from_env("MAP_UNITS_PATH", DEFAULT_UNITS_PATH)
}

pub fn territories_path() -> PathBuf {
    path_from_env("MAP_TERRITORIES_PATH", DEFAULT_TERRITORIES_PATH)
}

pub fn client_dist_dir() -> PathBuf {
    path_from_env("CLIENT_DIST_DIR", DEFAULT_CLIENT_DIST_DIR)
}

fn path_from_env(name: &str, default: &str) -> PathBuf {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_unset() {
        temp_env::with_vars_unset(
            ["SERVER_PORT", "MAP_UNITS_PATH", "MAP_TERRITORIES_PATH", "CLIENT_DIST_DIR"],
            || {
                assert_eq!(server_port(), DEFAULT_SERVER_PORT);
                assert_eq!(units_path(), PathBuf::from(DEFAULT_UNITS_PATH));
                assert_eq!(territories_path(), PathBuf::from(DEFAULT_TERRITORIES_PATH));
                assert_eq!(client_dist_dir(), PathBuf::from(DEFAULT_CLIENT_DIST_DIR));
            },
        );
    }

    #[test]
    fn env_overrides_are_used() {
        temp_env::with_vars(
            [
                ("SERVER_PORT", Some("8080")),
                ("MAP_UNITS_PATH", Some("/srv/map/units.json")),
            ],
            || {
                assert_eq!(server_port(), 8080);
                assert_eq!(units_path(), PathBuf::from("/srv/map/units.json"));
            },
        );
    }

    #[test]
    fn invalid_or_blank_values_fall_back_to_defaults() {
        temp_env::with_vars(
            [
                ("SERVER_PORT", Some("0")),
                ("MAP_TERRITORIES_PATH", Some("   ")),
            ],
            || {
                assert_eq!(server_port(), DEFAULT_SERVER_PORT);
                assert_eq!(territories_path(), PathBuf::from(DEFAULT_TERRITORIES_PATH));
            },
        );
        temp_env::with_var("SERVER_PORT", Some("not-a-port"), || {
            assert_eq!(server_port(), DEFAULT_SERVER_PORT);
        });
    }
}
