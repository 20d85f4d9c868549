//! Integration tests for the Decoder facade and the shared TypeRegistry.

mod common;

use std::io::Cursor;
use std::sync::Arc;
use std::thread;

use common::*;
use safe_deserialize::{Decoder, ErrorKind, OptionOverride, Options, Shaped, TypeRegistry};

#[test]
fn test_decoder_reuse() {
    let registry = TypeRegistry::new();
    registry.register_type::<SimpleUser>();

    let decoder = Decoder::new([
        OptionOverride::MaxSize(1 << 16),
        OptionOverride::MaxDepth(16),
        registry.as_option(),
    ]);

    for _ in 0..3 {
        let mut user = SimpleUser::default();
        decoder.json(USER_JSON, &mut user).unwrap();
        assert_eq!(user, expected_user());
    }
}

#[test]
fn test_decoder_covers_every_format() {
    let decoder = Decoder::default();
    let user = expected_user();

    let mut out = SimpleUser::default();
    decoder.json_reader(Cursor::new(USER_JSON), &mut out).unwrap();
    assert_eq!(out, user);

    let yaml = serde_yaml::to_string(&user).unwrap();
    let mut out = SimpleUser::default();
    decoder.yaml(yaml.as_bytes(), &mut out).unwrap();
    assert_eq!(out, user);

    let mut out = SimpleUser::default();
    decoder.yaml_reader(yaml.as_bytes(), &mut out).unwrap();
    assert_eq!(out, user);

    let xml = b"<SimpleUser><id>1</id><name>a</name><email>a@b.c</email></SimpleUser>";
    let mut out = SimpleUser::default();
    decoder.xml(xml, &mut out).unwrap();
    assert_eq!(out, user);

    let mut out = SimpleUser::default();
    decoder.xml_reader(&xml[..], &mut out).unwrap();
    assert_eq!(out, user);

    let bin = bincode::serialize(&user).unwrap();
    let mut out = SimpleUser::default();
    decoder.binary(&bin, &mut out).unwrap();
    assert_eq!(out, user);

    let mut out = SimpleUser::default();
    decoder.binary_reader(Cursor::new(bin), &mut out).unwrap();
    assert_eq!(out, user);
}

#[test]
fn test_decoder_uses_fixed_options() {
    let decoder = Decoder::with_options(Options::default().with_max_size(8));
    let mut user = SimpleUser::default();
    let err = decoder.json(USER_JSON, &mut user).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DataTooLarge);
}

#[test]
fn test_decoder_whitelist_is_a_snapshot() {
    let registry = TypeRegistry::new();
    registry.register_type::<NestedConfig>();
    let decoder = Decoder::new([registry.as_option()]);

    registry.register_type::<SimpleUser>();
    assert!(registry.is_type_registered::<SimpleUser>());

    let mut user = SimpleUser::default();
    let err = decoder.json(USER_JSON, &mut user).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeNotAllowed);

    let refreshed = Decoder::new([registry.as_option()]);
    refreshed.json(USER_JSON, &mut user).unwrap();
}

#[test]
fn test_registry_sample_normalization() {
    let registry = TypeRegistry::new();
    let user = expected_user();
    let boxed = Box::new(user.clone());

    registry.register(&boxed);
    assert!(registry.is_registered(&user));
    assert!(registry.is_registered(&&user));
    assert!(!registry.is_registered(&Settings::default()));
    assert_eq!(registry.type_names(), vec![SimpleUser::shape().name().to_string()]);
}

#[test]
fn test_registry_chaining() {
    let registry = TypeRegistry::new();
    registry
        .register_type::<SimpleUser>()
        .register_type::<Settings>()
        .register_all([NestedConfig::shape()]);
    assert_eq!(registry.len(), 3);
}

#[test]
fn test_concurrent_registration_and_decoding() {
    let registry = TypeRegistry::new();
    registry.register_type::<SimpleUser>();
    let decoder = Arc::new(Decoder::new([registry.as_option()]));

    let mut handles = Vec::new();
    for worker in 0..8 {
        let registry = registry.clone();
        let decoder = Arc::clone(&decoder);
        handles.push(thread::spawn(move || {
            for _ in 0..200 {
                if worker % 2 == 0 {
                    registry.register_type::<Settings>();
                    registry.register_type::<NestedConfig>();
                } else {
                    let names = registry.type_names();
                    assert!(names.contains(&SimpleUser::shape().name().to_string()));
                    let options = Options::from_overrides([registry.as_option()]);
                    assert!(options.is_type_allowed(SimpleUser::shape().name()));
                }

                let mut user = SimpleUser::default();
                decoder.json(USER_JSON, &mut user).unwrap();
                assert_eq!(user, expected_user());
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(registry.len(), 3);
    let mut expected = vec![
        SimpleUser::shape().name().to_string(),
        Settings::shape().name().to_string(),
        NestedConfig::shape().name().to_string(),
    ];
    expected.sort();
    assert_eq!(registry.type_names(), expected);
}
