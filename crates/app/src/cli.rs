/// Inspect and edit files through the piece-table document store.
#[derive(Debug, clap::Parser)]
#[command(name = "ced", version)]
pub struct Cli {
    #[command(flatten)]
    pub open: OpenArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, clap::Args)]
pub struct OpenArgs {
    /// How to bring the file into memory.
    #[arg(long, global = true, value_enum, default_value_t = LoadArg::Auto)]
    pub load: LoadArg,

    /// Files at least this many bytes are memory-mapped with `--load auto`.
    #[arg(long, global = true, default_value_t = doc_core::options::DEFAULT_MMAP_THRESHOLD)]
    pub mmap_threshold: u64,

    /// Capacity of one edit-buffer chunk, in bytes.
    #[arg(long, global = true, default_value_t = doc_core::options::DEFAULT_CHUNK_CAPACITY)]
    pub chunk_capacity: usize,

    /// Refuse to modify the document.
    #[arg(long, global = true)]
    pub read_only: bool,
}

impl OpenArgs {
    pub fn options(&self) -> doc_core::Options {
        doc_core::Options {
            load: self.load.into(),
            mmap_threshold: self.mmap_threshold,
            chunk_capacity: self.chunk_capacity,
            read_only: self.read_only,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LoadArg {
    Auto,
    Mmap,
    Read,
}

impl From<LoadArg> for doc_core::enums::LoadStrategy {
    fn from(value: LoadArg) -> Self {
        match value {
            LoadArg::Auto => doc_core::enums::LoadStrategy::Auto,
            LoadArg::Mmap => doc_core::enums::LoadStrategy::Mmap,
            LoadArg::Read => doc_core::enums::LoadStrategy::Read,
        }
    }
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Print the file line by line.
    Cat {
        file: std::path::PathBuf,

        /// Spaces each tab expands to.
        #[arg(long, default_value_t = 4)]
        tab_width: usize,
    },
    /// Print the bytes between two offsets.
    Slice {
        file: std::path::PathBuf,
        begin: u64,
        end: u64,
    },
    /// Append text to the end of the file.
    Append {
        file: std::path::PathBuf,
        text: String,
    },
    /// Insert text at a byte offset.
    Insert {
        file: std::path::PathBuf,
        offset: u64,
        text: String,
    },
    /// Delete the bytes between two offsets.
    Remove {
        file: std::path::PathBuf,
        begin: u64,
        end: u64,
    },
    /// Show length, piece and line counts.
    Stat { file: std::path::PathBuf },
}
