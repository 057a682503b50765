// Small readers for sysfs-style attribute files

use std::fs;
use std::io;
use std::path::Path;

/// Read an attribute file and strip the trailing newline.
pub fn read_trimmed(path: &Path) -> io::Result<String> {
    let raw = fs::read_to_string(path)?;
    Ok(raw.trim().to_string())
}

/// Read an attribute file holding a single number.
///
/// A file that exists but does not parse is reported as `InvalidData`.
pub fn read_number(path: &Path) -> io::Result<f64> {
    let raw = read_trimmed(path)?;
    raw.parse::<f64>().map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{}: {:?} is not a number ({})", path.display(), raw, e),
        )
    })
}

/// Read the first attribute in `candidates` that exists under `dir`.
pub fn read_first_number(dir: &Path, candidates: &[&str]) -> io::Result<f64> {
    let mut last_err = io::Error::new(io::ErrorKind::NotFound, "no candidate attribute");
    for name in candidates {
        match read_number(&dir.join(name)) {
            Ok(value) => return Ok(value),
            Err(e) if e.kind() == io::ErrorKind::NotFound => last_err = e,
            Err(e) => return Err(e),
        }
    }
    Err(last_err)
}
