/// Maps a component to the file name suffix its output carries, if any.
pub trait FileExtProvider {
    fn file_ext(&self) -> Option<&'static str>;
}
