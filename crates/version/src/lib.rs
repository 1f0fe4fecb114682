use git_version::git_version;
use target_info::Target;

lazy_static::lazy_static! {
    pub static ref SHORT_VERSION: String = VERSION.replace("cowcli/", "");
}

/// Returns the current version of this build of cowcli.
///
/// A plus-sign (`+`) is appended to the git commit if the tree is dirty.
/// Commit hash is omitted if the sources don't include git information.
///
/// ## Example
///
/// `cowcli/v0.1.0-67da032+`
pub const VERSION: &str = git_version!(
    args = [
        "--always",
        "--dirty=+",
        "--abbrev=7",
        // NOTE: using --match instead of --exclude for compatibility with old Git
        "--match=thiswillnevermatchlol"
    ],
    prefix = "cowcli/v0.1.0-",
    fallback = "cowcli/v0.1.0"
);

/// Returns `VERSION`, but with platform information appended to the end.
///
/// ## Example
///
/// `cowcli/v0.1.0-67da032+/x86_64-linux`
pub fn version_with_platform() -> String {
    format!("{}/{}-{}", VERSION, Target::arch(), Target::os())
}

#[cfg(test)]
mod test {
    use super::*;
    use regex::Regex;

    #[test]
    fn version_formatting() {
        let re = Regex::new(r"^cowcli/v[0-9]+\.[0-9]+\.[0-9]+(-rc.[0-9])?(-[[:xdigit:]]{7})?\+?$")
            .unwrap();
        assert!(re.is_match(VERSION), "version doesn't match regex: {}", VERSION);
    }
}
