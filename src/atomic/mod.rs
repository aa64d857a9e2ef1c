mod file;

use std::io::{Result, Write};

pub use file::{AtomicFile, TmpFile};

/// Replace the whole content of `atomic_file` with `data`.
///
/// Not a transaction: of two concurrent writers, the later swap wins.
pub fn write(atomic_file: &AtomicFile, data: &[u8]) -> Result<()> {
    let tmp = atomic_file.make_temp()?;
    (&tmp).write_all(data)?;
    (&tmp).flush()?;
    atomic_file.replace(tmp)
}
