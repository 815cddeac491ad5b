use crate::config::types::{
    Config, DeliveryConfig, ExtractionRules, FetcherConfig, FieldQuery, PageEncoding,
    PaginationStyle, QueryMode, ScanConfig, SiteDescriptor, StorageConfig,
};
use crate::url::render_page_url;
use crate::ConfigError;
use scraper::Selector;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_fetcher_config(&config.fetcher)?;
    validate_scan_config(&config.scan)?;
    validate_delivery_config(&config.delivery)?;
    validate_storage_config(&config.storage)?;
    validate_sites(&config.sites)?;
    Ok(())
}

fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.max_tries < 1 {
        return Err(ConfigError::Validation(format!(
            "max-tries must be >= 1, got {}",
            config.max_tries
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    Ok(())
}

fn validate_scan_config(config: &ScanConfig) -> Result<(), ConfigError> {
    if config.failure_threshold < 1 {
        return Err(ConfigError::Validation(format!(
            "failure-threshold must be >= 1, got {}",
            config.failure_threshold
        )));
    }
    Ok(())
}

fn validate_delivery_config(config: &DeliveryConfig) -> Result<(), ConfigError> {
    if config.ip.trim().is_empty() {
        return Err(ConfigError::Validation("delivery ip cannot be empty".to_string()));
    }

    // The scheme is derived from whether a port is configured
    if config.ip.to_lowercase().starts_with("http") {
        return Err(ConfigError::Validation(format!(
            "delivery ip must not include the protocol, got '{}'",
            config.ip
        )));
    }

    if config.request_param.trim().is_empty() {
        return Err(ConfigError::Validation(
            "delivery request-param cannot be empty".to_string(),
        ));
    }

    Url::parse(&config.endpoint())
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid delivery endpoint: {}", e)))?;

    Ok(())
}

fn validate_storage_config(config: &StorageConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database-path cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_sites(sites: &[SiteDescriptor]) -> Result<(), ConfigError> {
    let mut names = HashSet::new();

    for site in sites {
        let name = site.name.trim().to_lowercase();
        if name.is_empty() {
            return Err(ConfigError::Validation("site name cannot be empty".to_string()));
        }
        if !names.insert(name) {
            return Err(ConfigError::Validation(format!(
                "duplicate site name '{}'",
                site.name
            )));
        }

        validate_site(site)?;
    }

    Ok(())
}

fn validate_site(site: &SiteDescriptor) -> Result<(), ConfigError> {
    Url::parse(&site.base_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid base-url '{}': {}", site.base_url, e))
    })?;

    render_page_url(&site.paged_url, 2).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid paged-url for '{}': {}", site.name, e))
    })?;

    if site.initial_page < 1 {
        return Err(ConfigError::Validation(format!(
            "initial-page for '{}' must be >= 1",
            site.name
        )));
    }

    if let PageEncoding::Offset { page_size } = site.page_encoding {
        if page_size < 1 {
            return Err(ConfigError::Validation(format!(
                "page-size for '{}' must be >= 1",
                site.name
            )));
        }
    }

    if site.pagination == PaginationStyle::Bounded && site.rules.pagination.is_none() {
        return Err(ConfigError::Validation(format!(
            "bounded site '{}' needs a pagination rule",
            site.name
        )));
    }

    validate_rules(&site.name, &site.rules)
}

fn validate_rules(site: &str, rules: &ExtractionRules) -> Result<(), ConfigError> {
    validate_selector(site, "card", &rules.card)?;
    validate_query(site, "url", &rules.url)?;
    validate_query(site, "title", &rules.title)?;

    let optional_queries = [
        ("image", &rules.image),
        ("company", &rules.company),
        ("company-image", &rules.company_image),
        ("description", &rules.description),
        ("deadline", &rules.deadline),
        ("tags", &rules.tags),
    ];
    for (field, query) in optional_queries {
        if let Some(query) = query {
            validate_query(site, field, query)?;
        }
    }

    if let Some(labelled) = &rules.deadline_label {
        validate_selector(site, "deadline-label.item", &labelled.item)?;
        validate_selector(site, "deadline-label.label", &labelled.label)?;
        validate_selector(site, "deadline-label.value", &labelled.value)?;
        if labelled.label_text.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "deadline-label label-text for '{}' cannot be empty",
                site
            )));
        }
    }

    if let Some(attributes) = &rules.attributes {
        validate_selector(site, "attributes.item", &attributes.item)?;
        validate_selector(site, "attributes.label", &attributes.label)?;
        if let Some(value) = &attributes.value {
            validate_selector(site, "attributes.value", value)?;
        }
    }

    if let Some(pagination) = &rules.pagination {
        validate_selector(site, "pagination.item", &pagination.item)?;
        if pagination.page_param.is_empty() {
            return Err(ConfigError::Validation(format!(
                "pagination page-param for '{}' cannot be empty",
                site
            )));
        }
    }

    Ok(())
}

fn validate_query(site: &str, field: &str, query: &FieldQuery) -> Result<(), ConfigError> {
    validate_selector(site, field, &query.selector)?;

    if query.mode == QueryMode::Attr && query.attr.as_deref().map_or(true, str::is_empty) {
        return Err(ConfigError::Validation(format!(
            "field '{}' of site '{}' reads an attribute but names none",
            field, site
        )));
    }

    Ok(())
}

fn validate_selector(site: &str, field: &str, selector: &str) -> Result<(), ConfigError> {
    Selector::parse(selector).map_err(|_| ConfigError::InvalidSelector {
        site: site.to_string(),
        field: field.to_string(),
        selector: selector.to_string(),
    })?;
    Ok(())
}
