//! Builder façade.
//!
//! A [`ConfigBuilder`] owns one options store, one loader registry and one
//! plugin registry for a single [`BuildTarget`]. Profile logic mutates them
//! through the accessors; [`ConfigBuilder::create`] realizes everything into
//! the final bundler configuration.
//!
//! # Example
//!
//! ```
//! use packrig::builder::ConfigBuilder;
//! use packrig::config::BuildTarget;
//!
//! let mut target = BuildTarget::new("app", "./src/main.js");
//! target.production = true;
//!
//! let builder = ConfigBuilder::with_defaults(target).unwrap();
//! let config = builder.create().unwrap();
//!
//! assert_eq!(config["output"]["filename"], "js/[name].[chunkhash:7].js");
//! assert!(config.get("devtool").is_none());
//! ```

use crate::assets::AssetNames;
use crate::compose::compose;
use crate::config::store::{ConfigStore, Options};
use crate::config::target::BuildTarget;
use crate::error::Result;
use crate::lazy::{Enablement, Lazy};
use crate::loaders::{LoaderDescriptor, LoaderRegistry};
use crate::plugins::{PluginConstructor, PluginDescriptor, PluginRegistry};
use crate::style::{
    DefaultStyleRules, StyleContributions, StyleOptions, StyleRules, EXTRACT_PLUGIN,
};
use serde_json::{json, Value};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Pattern of script files handled by the transpiler.
pub const SCRIPT_TEST: &str = r"\.jsx?$";

/// Pattern of JSON files.
pub const JSON_TEST: &str = r"\.json$";

/// Pattern of images handled by the inlining loader.
pub const IMAGE_TEST: &str = r"\.(png|jpe?g|gif|svg)$";

/// Dependency directory excluded from transpilation.
pub const DEPENDENCY_DIR: &str = "node_modules";

/// Images up to this many bytes are inlined as data URLs.
pub const IMAGE_INLINE_LIMIT: u64 = 1024;

/// Extensions resolved when the target does not list any.
pub const DEFAULT_EXTENSIONS: [&str; 3] = [".js", ".jsx", ".json"];

/// Source map style for development builds without an explicit `devtool`.
pub const DEFAULT_DEVTOOL: &str = "cheap-module-eval-source-map";

/// Owns the options store and both registries for one build target.
pub struct ConfigBuilder {
    target: BuildTarget,
    assets: AssetNames,
    store: ConfigStore,
    loaders: LoaderRegistry,
    plugins: PluginRegistry,
    style: Box<dyn StyleRules>,
    style_options: StyleOptions,
    // Mirrors `style_options.extract_css` for the extraction plugin's
    // predicate; refreshed by `create`.
    extract_css: Arc<AtomicBool>,
}

impl ConfigBuilder {
    /// Create a builder whose options hold the target's structural settings
    /// and whose registries are empty.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTarget` if the target fails validation.
    pub fn new(target: BuildTarget) -> Result<Self> {
        target.validate()?;

        let mut assets = AssetNames::new(target.hash_length, target.production)?;
        if let Some(directory) = &target.asset_directory {
            assets = assets.with_directory(directory.as_str());
        }

        let style_options = StyleOptions {
            extract_css: target.extract_css,
            style_loader_name: target.style_loader.clone(),
            style_loader_option: target.style_loader_options.clone().unwrap_or(Value::Null),
            source_map: !target.production,
        };

        let extract_css = Arc::new(AtomicBool::new(style_options.extract_css));

        let mut store = ConfigStore::new(target.production);
        seed_options(&mut store, &target, &assets);

        tracing::debug!(
            production = target.production,
            entries = target.entry.len(),
            "Created config builder"
        );

        Ok(Self {
            target,
            assets,
            store,
            loaders: LoaderRegistry::new(),
            plugins: PluginRegistry::new(),
            style: Box::new(DefaultStyleRules),
            style_options,
            extract_css,
        })
    }

    /// Create a builder with the standard rules and plugins registered.
    ///
    /// Rules, in order: scripts through `babel-loader` (dependencies
    /// excluded), JSON through `json-loader`, images through `url-loader`
    /// inlined up to [`IMAGE_INLINE_LIMIT`] bytes.
    ///
    /// Plugins, in order: `NoEmitOnErrorsPlugin`, `ProgressPlugin`,
    /// `DefinePlugin`, `UglifyJsPlugin` (production only) and the CSS
    /// extraction plugin (when the style options extract CSS).
    pub fn with_defaults(target: BuildTarget) -> Result<Self> {
        let mut builder = Self::new(target)?;
        builder.register_default_loaders()?;
        builder.register_default_plugins()?;
        Ok(builder)
    }

    fn register_default_loaders(&mut self) -> Result<()> {
        let production = self.target.production;
        self.loaders.push(
            LoaderDescriptor::new(SCRIPT_TEST, "babel-loader")?
                .with_fields(json!({ "exclude": DEPENDENCY_DIR }))?
                .with_deferred(move || Ok(json!({ "options": { "cacheDirectory": !production } }))),
        );
        self.loaders.add(JSON_TEST, "json-loader", Value::Null)?;
        self.loaders.add(
            IMAGE_TEST,
            "url-loader",
            json!({
                "options": {
                    "limit": IMAGE_INLINE_LIMIT,
                    "name": self.assets.image(),
                }
            }),
        )?;
        Ok(())
    }

    fn register_default_plugins(&mut self) -> Result<()> {
        let production = self.target.production;

        self.plugins
            .add(PluginConstructor::bundler("NoEmitOnErrorsPlugin"), None, true)?;
        self.plugins
            .add(PluginConstructor::bundler("ProgressPlugin"), None, true)?;
        self.plugins.add(
            PluginConstructor::bundler("DefinePlugin"),
            Some(Lazy::deferred(move || {
                let env = if production { "production" } else { "development" };
                Ok(vec![json!({ "process.env": { "NODE_ENV": format!("\"{}\"", env) } })])
            })),
            true,
        )?;
        self.plugins.push(
            PluginDescriptor::new(PluginConstructor::bundler("UglifyJsPlugin"))
                .with_args(vec![json!({ "compress": { "warnings": false } })])
                .enabled(production),
        )?;
        let extract_css = Arc::clone(&self.extract_css);
        self.plugins.push(
            PluginDescriptor::new(PluginConstructor::bundler(EXTRACT_PLUGIN))
                .with_args(vec![json!({ "filename": self.assets.stylesheet() })])
                .enabled(Enablement::when(move || Ok(extract_css.load(Ordering::SeqCst)))),
        )?;
        Ok(())
    }

    pub fn target(&self) -> &BuildTarget {
        &self.target
    }

    pub fn is_production(&self) -> bool {
        self.target.production
    }

    pub fn assets(&self) -> &AssetNames {
        &self.assets
    }

    /// Current options snapshot, without realized rules and plugins.
    pub fn options(&self) -> Options {
        self.store.options()
    }

    pub fn store_mut(&mut self) -> &mut ConfigStore {
        &mut self.store
    }

    pub fn loaders(&self) -> &LoaderRegistry {
        &self.loaders
    }

    pub fn loaders_mut(&mut self) -> &mut LoaderRegistry {
        &mut self.loaders
    }

    pub fn plugins(&self) -> &PluginRegistry {
        &self.plugins
    }

    pub fn plugins_mut(&mut self) -> &mut PluginRegistry {
        &mut self.plugins
    }

    pub fn style_options(&self) -> &StyleOptions {
        &self.style_options
    }

    pub fn style_options_mut(&mut self) -> &mut StyleOptions {
        &mut self.style_options
    }

    /// Replace the collaborator producing stylesheet rules.
    pub fn set_style_rules(&mut self, style: impl StyleRules + 'static) -> &mut Self {
        self.style = Box::new(style);
        self
    }

    /// Rules and derived style-loader option for the current style options.
    pub fn style_contributions(&self) -> Result<StyleContributions> {
        self.style.contribute(&self.style_options)
    }

    /// Realize both registries and merge them into the options.
    ///
    /// The extraction plugin follows `style_options().extract_css` as it is
    /// at this call, the same flag the style rules read.
    ///
    /// # Errors
    ///
    /// Returns the first error raised while producing style rules or
    /// realizing descriptors; no partial configuration is returned.
    pub fn create(&self) -> Result<Value> {
        self.extract_css
            .store(self.style_options.extract_css, Ordering::SeqCst);
        let style = self.style_contributions()?;
        compose(&self.store.options(), &self.loaders, &self.plugins, &style)
    }
}

impl fmt::Debug for ConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigBuilder")
            .field("target", &self.target)
            .field("store", &self.store)
            .field("loaders", &self.loaders)
            .field("plugins", &self.plugins)
            .field("style_options", &self.style_options)
            .finish_non_exhaustive()
    }
}

fn seed_options(store: &mut ConfigStore, target: &BuildTarget, assets: &AssetNames) {
    for (name, entry) in &target.entry {
        store.add_entry(name, entry.modules());
    }

    store
        .set_output_path(&target.output_path)
        .set_public_path(&target.public_path)
        .set_filename(&assets.script())
        .set_chunk_filename(&assets.chunk())
        .set_target(&target.platform);

    if target.extensions.is_empty() {
        store.set_extensions(DEFAULT_EXTENSIONS);
    } else {
        store.set_extensions(target.extensions.iter().cloned());
    }

    for (name, path) in &target.alias {
        store.add_alias(name, path);
    }

    if let Some(externals) = &target.externals {
        store.set_externals(externals.clone());
    }

    let devtool = target.devtool.as_deref().unwrap_or(DEFAULT_DEVTOOL);
    store.set_dev_tool(devtool, false);
}
