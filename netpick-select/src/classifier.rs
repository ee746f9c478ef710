//! Keyword-based classification of adapter names

/// Keywords marking virtual adapters
pub const VIRTUAL_KEYWORDS: &[&str] = &[
    "zerotier",
    "vmware",
    "hyper-v",
    "virtual",
    "loopback",
    "tap",
    "bluetooth",
    "wan miniport",
];

/// Keywords marking VPN adapters
pub const VPN_KEYWORDS: &[&str] = &[
    "openvpn",
    "wireguard",
    "nordvpn",
    "expressvpn",
    "surfshark",
    "protonvpn",
    "cyberghost",
    "tunnel",
    "tun",
    "ppp",
    "pptp",
    "l2tp",
    "ipsec",
];

/// Keywords marking adapters that are never considered
pub const EXCLUDED_KEYWORDS: &[&str] = &["microsoft", "teredo", "isatap", "6to4", "teredo tunneling"];

/// Keyword sets a `Classifier` matches against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordTables {
    pub virtual_keywords: Vec<String>,
    pub vpn_keywords: Vec<String>,
    pub excluded_keywords: Vec<String>,
}

impl Default for KeywordTables {
    fn default() -> Self {
        Self {
            virtual_keywords: to_owned(VIRTUAL_KEYWORDS),
            vpn_keywords: to_owned(VPN_KEYWORDS),
            excluded_keywords: to_owned(EXCLUDED_KEYWORDS),
        }
    }
}

impl KeywordTables {
    /// Add a keyword to the virtual set
    pub fn with_virtual_keyword<S: Into<String>>(mut self, keyword: S) -> Self {
        self.virtual_keywords.push(keyword.into());
        self
    }

    /// Add a keyword to the VPN set
    pub fn with_vpn_keyword<S: Into<String>>(mut self, keyword: S) -> Self {
        self.vpn_keywords.push(keyword.into());
        self
    }

    /// Add a keyword to the excluded set
    pub fn with_excluded_keyword<S: Into<String>>(mut self, keyword: S) -> Self {
        self.excluded_keywords.push(keyword.into());
        self
    }
}

fn to_owned(keywords: &[&str]) -> Vec<String> {
    keywords.iter().map(|k| k.to_string()).collect()
}

fn lowercase_all(keywords: Vec<String>) -> Vec<String> {
    keywords.into_iter().map(|k| k.to_lowercase()).collect()
}

/// Classification flags for one adapter name
///
/// The flags are independent; a name can match several sets at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Classification {
    pub is_virtual: bool,
    pub is_vpn: bool,
    pub is_excluded: bool,
}

/// Case-insensitive substring matcher over immutable keyword tables
#[derive(Debug, Clone)]
pub struct Classifier {
    tables: KeywordTables,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(KeywordTables::default())
    }
}

impl Classifier {
    /// Create a classifier; keywords are lower-cased once here
    pub fn new(tables: KeywordTables) -> Self {
        Self {
            tables: KeywordTables {
                virtual_keywords: lowercase_all(tables.virtual_keywords),
                vpn_keywords: lowercase_all(tables.vpn_keywords),
                excluded_keywords: lowercase_all(tables.excluded_keywords),
            },
        }
    }

    /// Keyword tables in use
    pub fn tables(&self) -> &KeywordTables {
        &self.tables
    }

    /// Compute all three flags for `name`
    pub fn classify(&self, name: &str) -> Classification {
        let lower = name.to_lowercase();
        Classification {
            is_virtual: matches_any(&lower, &self.tables.virtual_keywords),
            is_vpn: matches_any(&lower, &self.tables.vpn_keywords),
            is_excluded: matches_any(&lower, &self.tables.excluded_keywords),
        }
    }

    pub fn is_virtual(&self, name: &str) -> bool {
        matches_any(&name.to_lowercase(), &self.tables.virtual_keywords)
    }

    pub fn is_vpn_adapter(&self, name: &str) -> bool {
        matches_any(&name.to_lowercase(), &self.tables.vpn_keywords)
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        matches_any(&name.to_lowercase(), &self.tables.excluded_keywords)
    }
}

fn matches_any(lower: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|keyword| lower.contains(keyword.as_str()))
}
