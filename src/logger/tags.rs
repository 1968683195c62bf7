/// Log tags identify the subsystem a message came from
///
/// Each tag maps to a `--debug-<key>` flag that enables its debug output.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogTag {
    System,
    Config,
    Webserver,
    Streams,
    Store,
    Api,
}

impl LogTag {
    pub const ALL: [LogTag; 6] = [
        LogTag::System,
        LogTag::Config,
        LogTag::Webserver,
        LogTag::Streams,
        LogTag::Store,
        LogTag::Api,
    ];

    /// Key used in `--debug-<key>` / `--verbose-<key>` flags
    pub fn to_debug_key(&self) -> String {
        match self {
            LogTag::System => "system",
            LogTag::Config => "config",
            LogTag::Webserver => "webserver",
            LogTag::Streams => "streams",
            LogTag::Store => "store",
            LogTag::Api => "api",
        }
        .to_string()
    }

    /// Uppercase label without colors, used in log files
    pub fn to_plain_string(&self) -> String {
        self.to_debug_key().to_uppercase()
    }

    pub fn from_debug_key(key: &str) -> Option<Self> {
        LogTag::ALL.iter().copied().find(|tag| tag.to_debug_key() == key)
    }
}

impl std::fmt::Display for LogTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_plain_string())
    }
}
