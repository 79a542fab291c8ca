//! Process-wide configuration: geometry, branding and document defaults.
//!
//! Loaded once at startup and shared read-only by every render. Every
//! load path validates, so a bad geometry fails before any invoice is
//! produced.

use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::geometry::Geometry;
use crate::layout::LayoutOptions;
use crate::model::{Address, BusinessInfo, PaymentInfo};

/// Values used when a document is assembled from a bare request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoiceDefaults {
    pub business: BusinessInfo,
    pub payment: PaymentInfo,
    /// Percentage, e.g. `20` for 20%.
    pub tax_rate: Decimal,
    pub payment_terms_days: u32,
    pub footer_notes: String,
}

impl Default for InvoiceDefaults {
    fn default() -> Self {
        InvoiceDefaults {
            business: BusinessInfo {
                name: "Tradebill Ltd".to_string(),
                address: Address::from_multiline("123 Example Street\nLondon\nUnited Kingdom"),
                ..Default::default()
            },
            payment: PaymentInfo::default(),
            tax_rate: Decimal::ZERO,
            payment_terms_days: 14,
            footer_notes: "Thank you for your business.\nPayments are due within 14 days unless otherwise agreed."
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Branding {
    pub currency_symbol: String,
    pub title: String,
    /// Logo used when the document names none.
    pub logo: Option<PathBuf>,
    /// TrueType font for regular text. Builtin Helvetica when absent.
    pub regular_font: Option<PathBuf>,
    /// TrueType font for bold text. Builtin Helvetica-Bold when absent.
    pub bold_font: Option<PathBuf>,
    pub continued_marker: bool,
    pub defaults: InvoiceDefaults,
}

impl Default for Branding {
    fn default() -> Self {
        let layout = LayoutOptions::default();
        Branding {
            currency_symbol: layout.currency_symbol,
            title: layout.title,
            logo: None,
            regular_font: None,
            bold_font: None,
            continued_marker: layout.continued_marker,
            defaults: InvoiceDefaults::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoiceConfig {
    pub geometry: Geometry,
    pub branding: Branding,
    /// FlateDecode page content, fonts and image pixels.
    pub compress: bool,
}

impl Default for InvoiceConfig {
    fn default() -> Self {
        InvoiceConfig {
            geometry: Geometry::default(),
            branding: Branding::default(),
            compress: true,
        }
    }
}

impl InvoiceConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Self::parse(json, "<inline>")
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&json, &path.display().to_string())
    }

    fn parse(json: &str, origin: &str) -> Result<Self, ConfigError> {
        let config: InvoiceConfig = serde_json::from_str(json).map_err(|source| ConfigError::Parse {
            origin: origin.to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.geometry.validate()?;
        if self.branding.defaults.tax_rate < Decimal::ZERO {
            return Err(ConfigError::Defaults("default tax rate is negative".to_string()));
        }
        Ok(())
    }

    /// Layout options for one document. `logo` says whether a logo will
    /// actually be drawn.
    pub fn layout_options(&self, logo: bool) -> LayoutOptions {
        LayoutOptions {
            currency_symbol: self.branding.currency_symbol.clone(),
            title: self.branding.title.clone(),
            continued_marker: self.branding.continued_marker,
            logo,
        }
    }
}
