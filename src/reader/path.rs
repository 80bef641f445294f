//! resolution of manifest and fetch paths against the bag root
//!
//! every path string that comes out of a tag file goes through [`resolve`]
//! before it is stored or touched on disk.

use std::path::{Component, Path, PathBuf};

use url::Url;

use crate::error::{Error, Result};

/// resolve a path listed in a manifest or fetch file to an absolute path
/// confined to `bag_root`
///
/// `bag_root` is expected to be absolute and normalized, as produced by the
/// bag reader.
pub fn resolve(bag_root: &Path, raw: &str) -> Result<PathBuf> {
    let mut fixed = raw;
    if let Some(stripped) = raw.strip_prefix('*') {
        // binary-mode marker left behind by md5sum and friends
        tracing::warn!("removing leading '*' from manifest path [{}]", raw);
        fixed = stripped;
    }

    if raw.contains('\\') {
        return Err(Error::InvalidFormat(format!(
            "path [{}] uses a backslash, which is not a valid path separator in a bag",
            raw
        )));
    }

    if raw.contains("~/") {
        return Err(Error::MaliciousPath(raw.to_string()));
    }

    if fixed.is_empty() {
        return Err(Error::InvalidFormat(format!("empty path in [{}]", raw)));
    }

    let decoded = decode_filename(fixed);

    let file = if decoded.starts_with("file://") {
        let url = Url::parse(&decoded)
            .map_err(|e| Error::InvalidFormat(format!("invalid file url [{}]: {}", raw, e)))?;
        let path = url
            .to_file_path()
            .map_err(|_| Error::InvalidFormat(format!("url [{}] is not a local file path", raw)))?;
        normalize(&path)
    } else {
        normalize(&bag_root.join(&decoded))
    };

    if !file.starts_with(normalize(bag_root)) {
        return Err(Error::MaliciousPath(file.display().to_string()));
    }

    Ok(file)
}

/// undo the percent escapes a bag writer applies to file names
///
/// only `%0A`, `%0D` and `%25` are escaped when writing; any other `%`
/// sequence is taken literally.
pub fn decode_filename(encoded: &str) -> String {
    let mut out = String::with_capacity(encoded.len());
    let mut rest = encoded;

    while let Some(idx) = rest.find('%') {
        out.push_str(&rest[..idx]);
        let tail = &rest[idx..];
        let decoded = match tail.get(1..3).map(|h| h.to_ascii_uppercase()) {
            Some(h) if h == "0A" => Some('\n'),
            Some(h) if h == "0D" => Some('\r'),
            Some(h) if h == "25" => Some('%'),
            _ => None,
        };
        match decoded {
            Some(c) => {
                out.push(c);
                rest = &tail[3..];
            }
            None => {
                out.push('%');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// inverse of [`decode_filename`]
pub fn encode_filename(path: &str) -> String {
    path.replace('%', "%25")
        .replace('\n', "%0A")
        .replace('\r', "%0D")
}

/// collapse `.` and `..` without touching the filesystem
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `/..` is `/`
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOT: &str = "/bags/b1";

    fn root() -> &'static Path {
        Path::new(ROOT)
    }

    #[test]
    fn test_plain_path() {
        let p = resolve(root(), "data/dir/file.txt").unwrap();
        assert_eq!(p, Path::new("/bags/b1/data/dir/file.txt"));
    }

    #[test]
    fn test_asterisk_is_stripped() {
        let p = resolve(root(), "*data/file.txt").unwrap();
        assert_eq!(p, Path::new("/bags/b1/data/file.txt"));
    }

    #[test]
    fn test_inner_dots_collapse() {
        let p = resolve(root(), "data/./x/../file.txt").unwrap();
        assert_eq!(p, Path::new("/bags/b1/data/file.txt"));
    }

    #[test]
    fn test_traversal_is_malicious() {
        for raw in [
            "../../etc/passwd",
            "../b2/data/file",
            "data/../../b1sibling",
            "/etc/passwd",
            "*../outside",
        ] {
            assert!(
                matches!(resolve(root(), raw), Err(Error::MaliciousPath(_))),
                "{} should be malicious",
                raw
            );
        }
    }

    #[test]
    fn test_home_dir_is_malicious() {
        assert!(matches!(
            resolve(root(), "~/evil.txt"),
            Err(Error::MaliciousPath(_))
        ));
        assert!(matches!(
            resolve(root(), "data/~/evil.txt"),
            Err(Error::MaliciousPath(_))
        ));
    }

    #[test]
    fn test_backslash_is_format_error() {
        assert!(matches!(
            resolve(root(), "data\\file.txt"),
            Err(Error::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_file_url_inside_root() {
        let p = resolve(root(), "file:///bags/b1/data/file.txt").unwrap();
        assert_eq!(p, Path::new("/bags/b1/data/file.txt"));
    }

    #[test]
    fn test_file_url_escaping_root() {
        assert!(matches!(
            resolve(root(), "file:///etc/passwd"),
            Err(Error::MaliciousPath(_))
        ));
        assert!(matches!(
            resolve(root(), "file:///bags/b1/../b2/x"),
            Err(Error::MaliciousPath(_))
        ));
    }

    #[test]
    fn test_empty_path() {
        assert!(matches!(resolve(root(), ""), Err(Error::InvalidFormat(_))));
        assert!(matches!(resolve(root(), "*"), Err(Error::InvalidFormat(_))));
    }

    #[test]
    fn test_decode_filename() {
        assert_eq!(decode_filename("data/a%0Ab%0dc"), "data/a\nb\rc");
        assert_eq!(decode_filename("data/100%25"), "data/100%");
        assert_eq!(decode_filename("data/%41%"), "data/%41%");
        assert_eq!(decode_filename("data/plain"), "data/plain");
    }

    #[test]
    fn test_encode_decode_inverse() {
        let name = "data/odd\nname\r%20.txt";
        assert_eq!(decode_filename(&encode_filename(name)), name);
    }

    #[test]
    fn test_decoded_newline_path() {
        let p = resolve(root(), "data/line%0Abreak.txt").unwrap();
        assert_eq!(p, Path::new("/bags/b1/data/line\nbreak.txt"));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Path::new("/a/b/../../..")), Path::new("/"));
        assert_eq!(normalize(Path::new("a/../../b")), Path::new("../b"));
        assert_eq!(normalize(Path::new("./a/./b")), Path::new("a/b"));
    }
}
