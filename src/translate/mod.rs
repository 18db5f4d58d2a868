//! Translation module for BhashaLink.
//!
//! This module provides:
//! * [`Translator`] — async trait implemented by all translation backends.
//! * [`NllbTranslator`] — hosted NLLB-200 inference endpoint client.
//! * [`TranslateError`] — error variants for translation.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use bhashalink::config::AppConfig;
//! use bhashalink::lang::{resolve_source, resolve_target};
//! use bhashalink::translate::{NllbTranslator, Translator};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let translator = NllbTranslator::from_config(&config.translation);
//!
//!     let hindi = translator
//!         .translate("Good morning", resolve_source("1. English"), resolve_target("2. Hindi"))
//!         .await
//!         .unwrap();
//!     println!("{hindi}");
//! }
//! ```

pub mod translator;

pub use crate::config::GenerationParams;
pub use translator::{NllbTranslator, TranslateError, Translator};
