use kindling_config::{ConfigBuilder, ConfigSource, EnvSource, MemorySource};

// --- Merge order ---

#[test]
fn later_layer_overrides_earlier_key() {
    let mut builder = ConfigBuilder::new();
    builder
        .add_source(MemorySource::new([("A", "1")]))
        .add_source(MemorySource::new([("A", "2"), ("B", "3")]));

    let config = builder.build().unwrap();
    assert_eq!(config.get("A"), Some("2"));
    assert_eq!(config.get("B"), Some("3"));
}

#[test]
fn empty_builder_produces_empty_view() {
    let config = ConfigBuilder::new().build().unwrap();
    assert!(config.is_empty());
    assert_eq!(config.get("anything"), None);
}

#[test]
fn clear_removes_registered_layers() {
    let mut builder = ConfigBuilder::new();
    builder.add_source(MemorySource::new([("A", "1")]));
    builder.clear();
    builder.add_source(MemorySource::new([("B", "2")]));

    let config = builder.build().unwrap();
    assert_eq!(config.get("A"), None);
    assert_eq!(config.get("B"), Some("2"));
}

#[test]
fn sources_are_inspectable_in_order() {
    let mut builder = ConfigBuilder::new();
    builder
        .add_source(MemorySource::new([("A", "1")]).named("first"))
        .add_source(MemorySource::new([("B", "2")]).named("second"));

    let names: Vec<&str> = builder.sources().iter().map(|s| s.name()).collect();
    assert_eq!(names, vec!["first", "second"]);
}

// --- Sections ---

#[test]
fn section_strips_qualifier() {
    let mut builder = ConfigBuilder::new();
    builder.add_source(MemorySource::new([
        ("Logging:Filter", "debug"),
        ("Logging:Ansi", "false"),
        ("Other", "x"),
    ]));

    let section = builder.build().unwrap().section("Logging");
    assert_eq!(section.get("Filter"), Some("debug"));
    assert_eq!(section.get("Ansi"), Some("false"));
    assert_eq!(section.get("Other"), None);
    assert_eq!(section.len(), 2);
}

#[test]
fn bare_prefix_key_is_not_part_of_section() {
    let mut builder = ConfigBuilder::new();
    builder.add_source(MemorySource::new([("Logging", "on"), ("Logging:Filter", "info")]));

    let section = builder.build().unwrap().section("Logging");
    assert_eq!(section.len(), 1);
    assert_eq!(section.get("Filter"), Some("info"));
}

// --- Environment source ---

#[test]
fn env_prefix_is_stripped_and_separator_mapped() {
    // Unique names so parallel tests cannot collide.
    unsafe {
        std::env::set_var("KINDLING_LAYERING_Logging__Filter", "warn");
        std::env::set_var("KINDLING_LAYERING_Plain", "yes");
    }

    let source = EnvSource::prefixed("KINDLING_LAYERING");
    let pairs = source.load().unwrap();
    assert!(pairs.contains(&("Logging:Filter".to_string(), "warn".to_string())));
    assert!(pairs.contains(&("Plain".to_string(), "yes".to_string())));
}

#[test]
fn env_source_skips_other_prefixes() {
    unsafe {
        std::env::set_var("KINDLING_OTHERPFX_Key", "1");
    }

    let source = EnvSource::prefixed("KINDLING_LAYERTWO");
    let pairs = source.load().unwrap();
    assert!(pairs.iter().all(|(key, _)| key != "Key"));
}

#[test]
fn env_layer_overrides_memory_layer() {
    unsafe {
        std::env::set_var("KINDLING_OVERRIDE_A", "env");
    }

    let mut builder = ConfigBuilder::new();
    builder
        .add_source(MemorySource::new([("A", "memory")]))
        .add_source(EnvSource::prefixed("KINDLING_OVERRIDE"));

    let config = builder.build().unwrap();
    assert_eq!(config.get("A"), Some("env"));
}
