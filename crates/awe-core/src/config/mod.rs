mod dirs;
mod settings;
mod validation;

pub use dirs::Directories;
pub use settings::{
    Config, FilterConfig, GeneralConfig, HistoryConfig, LayoutOverrides, ProcessSort,
    ProviderSettings, SetConfig, SshSettings, TopSettings, WindowConfig,
};
pub use validation::warn_unknown_fields;
