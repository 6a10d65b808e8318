//! Locating the game through the local Steam installation

use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Steam app id of Call to Arms - Gates of Hell
pub const APP_ID: &str = "400750";

const GAME_DIR: &str = "Call to Arms - Gates of Hell";

/// Steam roots checked under the home directory, in order
const STEAM_CANDIDATES: &[&str] = &[
    ".local/share/Steam",
    ".steam/steam",
    ".var/app/com.valvesoftware.Steam/.local/share/Steam",
];

/// Find the Steam installation directory
pub fn steam_path() -> Result<PathBuf> {
    let home = std::env::var_os("HOME")
        .map(PathBuf::from)
        .ok_or(Error::SteamNotFound)?;

    for candidate in STEAM_CANDIDATES {
        let path = home.join(candidate);
        if path.exists() {
            log::trace!("found steam path: {}", path.display());
            return Ok(path);
        }
    }
    Err(Error::SteamNotFound)
}

/// Find the game installation directory
pub fn game_path() -> Result<PathBuf> {
    game_path_in(&steam_path()?)
}

fn game_path_in(steam: &Path) -> Result<PathBuf> {
    let vdf = steam.join("steamapps/libraryfolders.vdf");
    let content = fs::read_to_string(&vdf).map_err(|e| Error::FileRead {
        path: vdf.clone(),
        source: e,
    })?;

    for library in library_paths(&content) {
        log::trace!("checking library {}", library);
        let library = PathBuf::from(library);
        let manifest = library
            .join("steamapps")
            .join(format!("appmanifest_{APP_ID}.acf"));
        if manifest.exists() {
            let game = library.join("steamapps/common").join(GAME_DIR);
            log::trace!("found game in {}", game.display());
            return Ok(game);
        }
    }

    Err(Error::GameNotFound)
}

/// Every `"path"` value in a libraryfolders.vdf
fn library_paths(vdf: &str) -> Vec<String> {
    vdf.lines().filter_map(path_value).collect()
}

/// Parse a `"path"  "<value>"` line
fn path_value(line: &str) -> Option<String> {
    let rest = line.trim().strip_prefix("\"path\"")?.trim_start();
    let value = rest.strip_prefix('"')?.strip_suffix('"')?;
    Some(value.replace("\\\\", "\\"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const VDF: &str = r#"
"libraryfolders"
{
	"0"
	{
		"path"		"/home/user/.local/share/Steam"
		"apps"
		{
			"228980"		"364790784"
		}
	}
	"1"
	{
		"path"		"/mnt/games/SteamLibrary"
	}
}
"#;

    #[test]
    fn test_library_paths() {
        assert_eq!(
            library_paths(VDF),
            vec!["/home/user/.local/share/Steam", "/mnt/games/SteamLibrary"]
        );
    }

    #[test]
    fn test_path_value_unescapes_backslashes() {
        assert_eq!(
            path_value("\t\"path\"\t\t\"C:\\\\Steam\""),
            Some("C:\\Steam".to_string())
        );
        assert_eq!(path_value("\"apps\" \"1\""), None);
    }

    #[test]
    fn test_game_path_in() {
        let dir = tempfile::tempdir().unwrap();
        let steam = dir.path().join("steam");
        let library = dir.path().join("library");
        std::fs::create_dir_all(steam.join("steamapps")).unwrap();
        std::fs::create_dir_all(library.join("steamapps")).unwrap();

        let vdf = format!(
            "\"libraryfolders\"\n{{\n\t\"0\"\n\t{{\n\t\t\"path\"\t\t\"{}\"\n\t}}\n}}\n",
            library.display()
        );
        std::fs::write(steam.join("steamapps/libraryfolders.vdf"), vdf).unwrap();

        // no manifest yet: the game is not installed anywhere
        assert!(matches!(game_path_in(&steam), Err(Error::GameNotFound)));

        std::fs::write(
            library.join(format!("steamapps/appmanifest_{APP_ID}.acf")),
            "installed",
        )
        .unwrap();
        let game = game_path_in(&steam).unwrap();
        assert_eq!(game, library.join("steamapps/common").join(GAME_DIR));
    }
}
