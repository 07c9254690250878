/// Ordered set of scaffolds that can be requested. The first entry is the default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateCatalog {
    templates: Vec<&'static str>,
}

impl Default for TemplateCatalog {
    fn default() -> Self {
        Self {
            templates: vec!["template", "apitemplate", "DJS14Template"],
        }
    }
}

impl TemplateCatalog {
    pub fn default_template(&self) -> &'static str {
        self.templates[0]
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.iter().any(|template| *template == name)
    }

    /// Maps a requested name onto the catalog, falling back to the default.
    pub fn resolve(&self, requested: &str) -> &'static str {
        self.templates
            .iter()
            .copied()
            .find(|template| *template == requested)
            .unwrap_or_else(|| self.default_template())
    }
}

/// Where scaffold archives are downloaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSource {
    /// Scheme and authority, without a trailing slash.
    pub host: String,
    pub owner: String,
    pub branch: String,
}

impl Default for RemoteSource {
    fn default() -> Self {
        Self {
            host: "https://github.com".to_string(),
            owner: "kars1996".to_string(),
            branch: "master".to_string(),
        }
    }
}

impl RemoteSource {
    /// URL of the zip export of `template`'s branch.
    pub fn archive_url(&self, template: &str) -> String {
        format!(
            "{}/{}/{}/archive/refs/heads/{}.zip",
            self.host.trim_end_matches('/'),
            self.owner,
            template,
            self.branch
        )
    }
}
