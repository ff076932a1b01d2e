//! Code generation targets

use crate::options::Options;

use super::Library;

mod cpp;
pub use cpp::Cpp;

/// Code generation target
pub trait Target {
    /// Emits the library as target code into a stream.
    fn write(f: impl std::io::Write, library: &Library, options: &Options) -> std::io::Result<()>;

    /// Emits the library as target code into a string.
    fn render(library: &Library, options: &Options) -> std::io::Result<String> {
        let mut buffer = vec![];
        Self::write(&mut buffer, library, options)?;
        String::from_utf8(buffer)
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))
    }
}
