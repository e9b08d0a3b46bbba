use super::*;
use crate::foundation::core::{BlendOp, Gravity, Offset, Rgba8};

#[test]
fn empty_documents_take_documented_defaults() {
    let compose: ComposeConfig = from_json_str("{}").unwrap();
    assert_eq!(compose, ComposeConfig::default());
    assert_eq!((compose.width, compose.height), (2048, 2048));
    assert_eq!(compose.background, Rgba8::WHITE);

    let cluster: ClusterConfig = from_json_str("{}").unwrap();
    assert_eq!(cluster, ClusterConfig::default());
    assert_eq!((cluster.width, cluster.height), (2700, 2050));
    assert_eq!(cluster.quality, 100);
    assert_eq!(cluster.shadow.sigma, 25.0);

    let primary: PrimaryMontageConfig = from_json_str("{}").unwrap();
    assert_eq!((primary.columns, primary.rows), (10, 1));
    assert_eq!(primary.label.size, 125.0);
    assert_eq!(primary.label.weight, 500);
    assert_eq!(primary.label.gravity, Gravity::West);

    let pattern: PatternConfig = from_json_str("{}").unwrap();
    assert_eq!(pattern.source, "*.png");
    assert!(pattern.preprocess);
    assert_eq!((pattern.full_resolution, pattern.full_quality), (3600, 100));
    assert_eq!((pattern.preview_resolution, pattern.preview_quality), (1024, 75));
}

#[test]
fn layer_fields_parse_with_defaults() {
    let layer: LayerSpec = from_json_str(
        r##"{
            "image": "art.png",
            "rotation": 45,
            "scale": 50,
            "label": { "text": "Hello", "color": "#ff000080" }
        }"##,
    )
    .unwrap();
    assert_eq!(layer.offset, Offset::ZERO);
    assert_eq!(layer.op, BlendOp::Over);
    let label = layer.label.as_ref().unwrap();
    assert_eq!(label.size, 48.0);
    assert_eq!(label.weight, 400);
    assert_eq!(label.color.a, 0x80);
    assert_eq!(label.gravity, Gravity::NorthWest);

    let t = layer.transforms();
    assert_eq!(t.rotation, Some(45.0));
    assert_eq!(t.scale, Some(50.0));
    assert!(t.distort.is_none());
}

#[test]
fn layer_without_image_or_label_is_empty() {
    assert!(LayerSpec::default().is_empty());
    let labelled = LayerSpec {
        label: Some(LabelSpec::default()),
        ..LayerSpec::default()
    };
    assert!(!labelled.is_empty());
}

#[test]
fn malformed_distort_is_config_error_with_layer_index() {
    let cfg = ComposeConfig {
        layers: vec![
            LayerSpec::default(),
            LayerSpec {
                distort: Some(vec![1.0, 2.0, 3.0]),
                ..LayerSpec::default()
            },
        ],
        ..ComposeConfig::default()
    };
    let err = cfg.validate().unwrap_err();
    assert!(err.is_config());
    assert!(err.to_string().contains("layer 1"));
}

#[test]
fn zero_canvas_is_rejected() {
    let cfg = ComposeConfig {
        width: 0,
        ..ComposeConfig::default()
    };
    assert!(cfg.validate().unwrap_err().is_config());
}

#[test]
fn cluster_groups_apply_table_to_remaining_count() {
    let cfg = ClusterConfig::default();
    assert_eq!(cfg.group_sizes_for(16), vec![3, 3, 3, 3, 4]);
    assert_eq!(cfg.group_sizes_for(12), vec![4, 4, 4]);
    assert_eq!(cfg.group_sizes_for(5), vec![1, 4]);
    assert_eq!(cfg.group_sizes_for(3), vec![1, 1, 1]);
    assert!(cfg.group_sizes_for(0).is_empty());
}

#[test]
fn oversized_group_entry_is_clamped_to_remaining() {
    let cfg = ClusterConfig {
        group_sizes: [(2, 9)].into_iter().collect(),
        ..ClusterConfig::default()
    };
    assert_eq!(cfg.group_sizes_for(3), vec![1, 2]);
}

#[test]
fn placement_index_clamps_to_last_entry() {
    let cfg = ClusterConfig::default();
    assert_eq!(cfg.placement(0), Placement::new(-1024, 1000, -32.0));
    assert_eq!(cfg.placement(2), Placement::new(-30, -1500, 37.0));
    assert_eq!(cfg.placement(3), cfg.placement(2));
    assert_eq!(cfg.placement(99), cfg.placement(2));
}

#[test]
fn cluster_output_name_substitutes_number() {
    let cfg = ClusterConfig::default();
    assert_eq!(cfg.output_name(3), "etsy_product_listing_image_3.jpeg");

    let bad = ClusterConfig {
        output: "fixed.jpeg".to_string(),
        ..ClusterConfig::default()
    };
    assert!(bad.validate().unwrap_err().is_config());
}

#[test]
fn cluster_rejects_empty_placements_and_zero_groups() {
    let no_placements = ClusterConfig {
        placements: Vec::new(),
        ..ClusterConfig::default()
    };
    assert!(no_placements.validate().is_err());

    let zero_group = ClusterConfig {
        group_sizes: [(4, 0)].into_iter().collect(),
        ..ClusterConfig::default()
    };
    assert!(zero_group.validate().is_err());
    assert!(ClusterConfig::default().validate().is_ok());
}

#[test]
fn group_table_parses_from_string_keys() {
    let cfg: ClusterConfig = from_json_str(r#"{ "group_sizes": { "6": 2 } }"#).unwrap();
    assert_eq!(cfg.group_sizes_for(6), vec![2, 1, 1, 1, 1]);
}

#[test]
fn partial_shadow_keeps_remaining_defaults() {
    let cfg: ClusterConfig = from_json_str(r#"{ "shadow": { "sigma": 4 } }"#).unwrap();
    assert_eq!(cfg.shadow.sigma, 4.0);
    assert_eq!(cfg.shadow.opacity, 0.5);
}

#[test]
fn pattern_names_are_zero_padded() {
    assert_eq!(PatternConfig::full_name(7), "image_007_fullsize.jpeg");
    assert_eq!(PatternConfig::preview_name(12), "image_012_preview.jpeg");
    let bad = PatternConfig {
        preview_quality: 0,
        ..PatternConfig::default()
    };
    assert!(bad.validate().is_err());
}

#[test]
fn globs_with_separators_are_rejected() {
    let bad = PatternConfig {
        source: "sub/*.png".to_string(),
        ..PatternConfig::default()
    };
    assert!(bad.validate().unwrap_err().is_config());
}

#[test]
fn label_validation() {
    assert!(LabelSpec::default().validate().is_ok());
    assert!(LabelSpec::default().is_blank());
    let heavy = LabelSpec {
        weight: 1000,
        ..LabelSpec::default()
    };
    assert!(heavy.validate().is_err());
    let boxed = LabelSpec {
        width: Some(0),
        ..LabelSpec::default()
    };
    assert!(boxed.validate().is_err());
}

#[test]
fn job_config_sections_are_optional() {
    let job: JobConfig = from_json_str("{}").unwrap();
    assert!(job.is_empty());
    assert!(job.validate().is_ok());

    let job: JobConfig = from_json_str(
        r#"{ "threads": 2, "preview": {}, "compose": [ { "output": "a.png" } ] }"#,
    )
    .unwrap();
    assert!(!job.is_empty());
    assert_eq!(job.threads, Some(2));
    assert_eq!(job.compose.len(), 1);
    assert!(job.validate().is_ok());

    let zero: JobConfig = from_json_str(r#"{ "threads": 0 }"#).unwrap();
    assert!(zero.validate().is_err());
}

#[test]
fn bad_json_is_serde_error_and_missing_file_is_config_error() {
    let err = from_json_str::<ComposeConfig>("{ not json").unwrap_err();
    assert!(matches!(err, FoundryError::Serde(_)));

    let err = from_json_str::<ComposeConfig>(r#"{ "background": "white" }"#).unwrap_err();
    assert!(matches!(err, FoundryError::Serde(_)));

    let dir = tempfile::tempdir().unwrap();
    assert!(
        load_json::<JobConfig>(&dir.path().join("missing.json"))
            .unwrap_err()
            .is_config()
    );

    let path = dir.path().join("job.json");
    std::fs::write(&path, r#"{ "compose": [ { "width": 10, "height": 10 } ] }"#).unwrap();
    let job: JobConfig = load_json(&path).unwrap();
    assert_eq!(job.compose[0].width, 10);
}
