//! Integration tests for composing a configuration through the builder.

use packrig::config::BuildTarget;
use packrig::lazy::{Enablement, Lazy};
use packrig::plugins::{PluginConstructor, PluginDescriptor};
use packrig::{ConfigBuilder, PackrigError};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

fn builder() -> ConfigBuilder {
    ConfigBuilder::with_defaults(BuildTarget::new("app", "./src/main.js")).unwrap()
}

fn plugin_names(config: &Value) -> Vec<&str> {
    config["plugins"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["plugin"].as_str().unwrap())
        .collect()
}

#[test]
fn registration_order_is_output_order() {
    let mut builder = builder();
    builder
        .loaders_mut()
        .add(r"\.vue$", "vue-loader", Value::Null)
        .unwrap();
    builder
        .plugins_mut()
        .add(PluginConstructor::bundler("HotModuleReplacementPlugin"), None, true)
        .unwrap();

    let config = builder.create().unwrap();
    let rules = config["module"]["rules"].as_array().unwrap();

    let loaders: Vec<_> = rules.iter().filter_map(|r| r["loader"].as_str()).collect();
    assert_eq!(
        loaders,
        vec!["babel-loader", "json-loader", "url-loader", "vue-loader"]
    );
    assert_eq!(plugin_names(&config).last(), Some(&"HotModuleReplacementPlugin"));
}

#[test]
fn style_rules_follow_registered_rules() {
    let config = builder().create().unwrap();
    let rules = config["module"]["rules"].as_array().unwrap();

    assert_eq!(rules.len(), 5);
    assert_eq!(rules[3]["test"], r"\.css$");
    assert_eq!(rules[4]["test"], r"\.s[ac]ss$");
}

#[test]
fn deferred_values_are_evaluated_per_realization() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let mut builder = builder();
    builder
        .loaders_mut()
        .set_deferred("url-loader", move || {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(json!({ "options": { "limit": n } }))
        })
        .unwrap();

    let first = builder.create().unwrap();
    let second = builder.create().unwrap();

    assert_eq!(first["module"]["rules"][2]["options"]["limit"], 1);
    assert_eq!(second["module"]["rules"][2]["options"]["limit"], 2);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn predicates_are_reevaluated() {
    let flag = Arc::new(AtomicBool::new(false));
    let probe = Arc::clone(&flag);

    let mut builder = builder();
    builder
        .plugins_mut()
        .add(
            PluginConstructor::bundler("BundleAnalyzerPlugin"),
            None,
            Enablement::when(move || Ok(probe.load(Ordering::SeqCst))),
        )
        .unwrap();

    assert!(!plugin_names(&builder.create().unwrap()).contains(&"BundleAnalyzerPlugin"));
    flag.store(true, Ordering::SeqCst);
    assert!(plugin_names(&builder.create().unwrap()).contains(&"BundleAnalyzerPlugin"));
}

#[test]
fn front_plugins_precede_defaults() {
    let mut builder = builder();
    builder
        .plugins_mut()
        .add_front([
            PluginDescriptor::new(PluginConstructor::bundler("CleanPlugin")),
            PluginDescriptor::new(PluginConstructor::bundler("CopyPlugin"))
                .with_args(vec![json!({ "from": "static" })]),
        ])
        .unwrap();

    let config = builder.create().unwrap();
    let names = plugin_names(&config);

    assert_eq!(&names[..3], &["CleanPlugin", "CopyPlugin", "NoEmitOnErrorsPlugin"]);
    assert_eq!(config["plugins"][1]["args"][0]["from"], "static");
}

#[test]
fn failing_evaluator_aborts_composition() {
    let mut builder = builder();
    builder
        .plugins_mut()
        .update(
            "DefinePlugin",
            Some(Lazy::deferred(|| Err(anyhow::anyhow!("env unavailable")))),
            None,
        )
        .unwrap();

    let err = builder.create().unwrap_err();
    assert!(matches!(err, PackrigError::Realization { .. }));
    assert!(err.to_string().contains("DefinePlugin"));
}

#[test]
fn deferred_options_cannot_clear_loader_identity() {
    let mut builder = builder();
    builder
        .loaders_mut()
        .set_deferred("json", || Ok(json!({ "loader": null, "test": 5 })))
        .unwrap();

    let err = builder.create().unwrap_err();
    assert!(matches!(err, PackrigError::Realization { .. }));
}

#[test]
fn extraction_follows_style_options_at_create() {
    let mut builder = builder();
    builder.style_options_mut().extract_css = true;

    let config = builder.create().unwrap();

    assert_eq!(
        config["module"]["rules"][3]["use"][0]["loader"],
        packrig::style::EXTRACT_LOADER
    );
    assert!(plugin_names(&config).contains(&packrig::style::EXTRACT_PLUGIN));
}

#[test]
fn unknown_identities_are_not_found() {
    let mut builder = builder();

    let err = builder
        .loaders_mut()
        .update(json!({ "loader": "ts-loader", "options": {} }))
        .unwrap_err();
    assert!(matches!(err, PackrigError::NotFound { .. }));

    let err = builder
        .plugins_mut()
        .update("MissingPlugin", None, Some(Enablement::Never))
        .unwrap_err();
    assert!(matches!(err, PackrigError::NotFound { .. }));
}

#[test]
fn production_build_drops_dev_only_settings() {
    let mut target = BuildTarget::new("app", "./src/main.js");
    target.production = true;
    let mut builder = ConfigBuilder::with_defaults(target).unwrap();
    builder
        .store_mut()
        .set_dev_server(json!({ "port": 8080 }), false);

    let config = builder.create().unwrap();

    assert!(config.get("devtool").is_none());
    assert!(config.get("devServer").is_none());
    assert!(plugin_names(&config).contains(&"UglifyJsPlugin"));
    assert_eq!(config["module"]["rules"][0]["options"]["cacheDirectory"], false);
}

#[test]
fn options_survive_composition() {
    let mut builder = builder();
    builder
        .store_mut()
        .set_option(json!({ "module": { "noParse": "jquery" } }))
        .unwrap();

    let config = builder.create().unwrap();

    assert_eq!(config["module"]["noParse"], "jquery");
    assert_eq!(config["entry"]["app"][0], "./src/main.js");
    assert!(builder.options().get("/module/rules").is_none());
}
