//! End-to-end load gate behavior over real files.

use resguard::gate::events::{ChannelObserver, LoadEvent};
use resguard::gate::LoadGate;
use resguard::{ResGuardError, ValidatorConfig};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use crate::common::sample_file_path;
use crate::common::test_data::*;
use crate::common::test_utils::{binary_with_script, disk_gate, path_str, write_resource, DiskHost, TestResource};

#[test]
fn test_safe_external_resource_loads() {
    let dir = TempDir::new().unwrap();
    let body = b"[gd_resource type=\"StandardMaterial3D\" load_steps=2 format=3]\n\n\
[ext_resource type=\"Texture2D\" path=\"res://textures/wood.png\" id=\"1\"]\n\n\
[resource]\nalbedo_texture = ExtResource(\"1\")\n";
    let path = write_resource(&dir, "wood.tres", body);

    let (gate, recorder) = disk_gate();
    let resource = gate.load(&path).unwrap();
    assert_eq!(
        resource,
        TestResource::Loaded {
            path: path.clone(),
            size: body.len()
        }
    );

    let events = recorder.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].path, path);
    assert!(events[0].success);
}

#[test]
fn test_material_fixture_loads_through_gate() {
    let path = path_str(&sample_file_path(GOOD_MATERIALS));
    let size = std::fs::metadata(&path).unwrap().len() as usize;

    let (gate, recorder) = disk_gate();
    assert_eq!(
        gate.load(&path).unwrap(),
        TestResource::Loaded {
            path: path.clone(),
            size
        }
    );
    let events = recorder.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].path, path);
    assert!(events[0].success);
}

#[test]
fn test_unsafe_binary_scene_is_replaced() {
    let dir = TempDir::new().unwrap();
    let path = write_resource(&dir, "level.scn", &binary_with_script(256));

    let (gate, recorder) = disk_gate();
    assert_eq!(gate.load(&path).unwrap(), TestResource::Empty);

    let events = recorder.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].path, path);
    assert!(!events[0].success);
}

#[test]
fn test_bad_fixtures_never_reach_host() {
    let (gate, recorder) = disk_gate();
    for name in [BAD_EXTERNAL_SCRIPT, BAD_EMBEDDED_SOURCE] {
        let path = path_str(&sample_file_path(name));
        assert_eq!(gate.load(&path).unwrap(), TestResource::Empty, "{name}");
    }
    let events = recorder.events();
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| !e.success));
}

#[test]
fn test_trusted_paths_are_not_intercepted() {
    let (gate, recorder) = disk_gate();
    assert!(!gate.recognize_path("res://scenes/main.tscn"));
    // Not on disk: the host's own read fails and no event is published.
    assert!(gate.load("res://scenes/main.tscn").is_err());
    assert!(recorder.events().is_empty());
}

#[test]
fn test_missing_external_file_fails() {
    let dir = TempDir::new().unwrap();
    let path = path_str(&dir.path().join("gone.tres"));

    let (gate, recorder) = disk_gate();
    assert!(matches!(gate.load(&path), Err(ResGuardError::Io(_))));
    let last = recorder.last().unwrap();
    assert_eq!(last.path, path);
    assert!(!last.success);
}

#[test]
fn test_oversized_file_is_replaced() {
    let dir = TempDir::new().unwrap();
    let path = write_resource(&dir, "huge.res", &vec![b' '; 2048]);

    let mut config = ValidatorConfig::default();
    config.io.max_file_size = 1024;
    let gate = LoadGate::from_config(&config, DiskHost).unwrap();
    let (tx, rx) = mpsc::channel();
    gate.subscribe(Arc::new(ChannelObserver::new(tx)));

    assert_eq!(gate.load(&path).unwrap(), TestResource::Empty);
    let event = rx.try_recv().unwrap();
    assert_eq!(event.path, path);
    assert!(!event.success);
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_observer_may_unsubscribe_during_load() {
    let dir = TempDir::new().unwrap();
    let path = write_resource(&dir, "ok.tres", b"[resource]\nvalue = 1\n");

    let (gate, recorder) = disk_gate();
    let gate = Arc::new(gate);
    let weak = Arc::downgrade(&gate);
    gate.subscribe(Arc::new(move |_: &LoadEvent| {
        if let Some(gate) = weak.upgrade() {
            gate.clear_observers();
        }
    }));

    let worker = {
        let gate = Arc::clone(&gate);
        let path = path.clone();
        std::thread::spawn(move || {
            gate.load(&path).unwrap();
            gate.load(&path).unwrap();
        })
    };
    worker.join().unwrap();
    assert_eq!(recorder.events().len(), 1);
}

#[test]
fn test_every_observer_sees_each_load_once() {
    let dir = TempDir::new().unwrap();
    let good = write_resource(&dir, "ok.tres", b"[resource]\nvalue = 1\n");
    let bad = write_resource(
        &dir,
        "bad.tres",
        b"[sub_resource type=\"CSharpScript\" id=\"1\"]\n",
    );

    let (gate, recorder) = disk_gate();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    gate.subscribe(Arc::new(move |e: &LoadEvent| {
        sink.lock().unwrap().push((e.path.clone(), e.success));
    }));

    gate.load(&good).unwrap();
    gate.load(&bad).unwrap();

    let expected = vec![(good, true), (bad, false)];
    let recorded: Vec<_> = recorder
        .events()
        .into_iter()
        .map(|e| (e.path, e.success))
        .collect();
    assert_eq!(recorded, expected);
    assert_eq!(*seen.lock().unwrap(), expected);
}

#[test]
fn test_handled_types() {
    let (gate, _) = disk_gate();
    for ty in ["Resource", "GDScript", "CSharpScript", "Script", "Scene", "PackedScene"] {
        assert!(gate.handles_type(ty), "{ty}");
    }
    assert!(!gate.handles_type("Image"));
}
