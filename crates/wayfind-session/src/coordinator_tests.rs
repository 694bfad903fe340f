//! End-to-end session scenarios on the demo building

use glam::Vec3;
use wayfind_align::{CameraPose, HeadingSample};
use wayfind_mesh::test_plan_helpers::{create_demo_plan, create_plan};
use wayfind_mesh::NavMeshConfig;
use wayfind_query::PathError;

use crate::sensor::tests::ScriptedSource;
use crate::{Command, SessionConfig, SessionCoordinator, SessionError};

const LOBBY: &str = "ENTRANCE\nLOBBY";
const LAB_1_CENTER: Vec3 = Vec3::new(18.0, 0.0, 10.0);

fn create_coordinator(config: SessionConfig) -> SessionCoordinator {
    SessionCoordinator::from_floor_plan(create_demo_plan(), &NavMeshConfig::default(), config)
        .unwrap()
}

fn camera_at(x: f32, z: f32) -> CameraPose {
    CameraPose::new(Vec3::new(x, 1.6, z), Vec3::Z)
}

fn assert_vec_close(a: Vec3, b: Vec3) {
    assert!((a - b).length() < 1e-3, "{:?} != {:?}", a, b);
}

#[test]
fn test_destinations_in_plan_order() {
    let coordinator = create_coordinator(SessionConfig::default());
    let destinations = coordinator.destinations();

    assert_eq!(destinations.len(), 6);
    assert_eq!(destinations[0].name, LOBBY);
    assert_eq!(destinations[0].label, "ENTRANCE LOBBY");
    assert_eq!(destinations[5].name, "STORAGE");
}

#[test]
fn test_default_user_position_is_start_room_center() {
    let coordinator = create_coordinator(SessionConfig::default());
    assert_eq!(coordinator.last_user_position(), Vec3::new(5.0, 0.0, 4.0));
    assert!(!coordinator.navigation().is_navigating());
}

#[test]
fn test_start_requires_destination() {
    let mut coordinator = create_coordinator(SessionConfig::default());

    assert_eq!(
        coordinator.handle(Command::StartNavigation),
        Err(SessionError::NoDestination)
    );
    assert_eq!(coordinator.last_error(), Some(&SessionError::NoDestination));
    assert!(!coordinator.navigation().is_navigating());
}

#[test]
fn test_unknown_destination_is_rejected() {
    let mut coordinator = create_coordinator(SessionConfig::default());

    // Names match exactly, display labels are not accepted
    assert_eq!(
        coordinator.select_destination("ENTRANCE LOBBY"),
        Err(SessionError::InvalidDestination("ENTRANCE LOBBY".to_string()))
    );
    assert_eq!(coordinator.navigation().destination(), None);
}

#[test]
fn test_navigate_to_lab() {
    let mut coordinator = create_coordinator(SessionConfig::default());

    coordinator.select_destination("LAB 1").unwrap();
    coordinator.start_navigation().unwrap();

    let navigation = coordinator.navigation();
    assert!(navigation.is_navigating());
    let path = navigation.path().unwrap();
    assert!(path.len() >= 3);
    assert_eq!(path[0], Vec3::new(5.0, 0.0, 4.0));
    assert_eq!(*path.last().unwrap(), LAB_1_CENTER);
    assert_eq!(navigation.segments().len(), path.len() - 1);
}

#[test]
fn test_destination_locked_while_navigating() {
    let mut coordinator = create_coordinator(SessionConfig::default());
    coordinator.select_destination("LAB 1").unwrap();
    coordinator.start_navigation().unwrap();

    assert_eq!(
        coordinator.select_destination("LAB 2"),
        Err(SessionError::DestinationLocked)
    );
    assert_eq!(coordinator.navigation().destination(), Some("LAB 1"));

    coordinator.handle(Command::StopNavigation).unwrap();
    assert!(!coordinator.navigation().is_navigating());
    coordinator.select_destination("LAB 2").unwrap();
    assert_eq!(coordinator.navigation().destination(), Some("LAB 2"));
}

#[test]
fn test_unreachable_destination_keeps_state() {
    let mut coordinator = create_coordinator(SessionConfig::default());
    coordinator.select_destination("STORAGE").unwrap();

    assert_eq!(
        coordinator.handle(Command::StartNavigation),
        Err(SessionError::Path(PathError::Unreachable))
    );
    assert!(!coordinator.navigation().is_navigating());
    assert_eq!(coordinator.navigation().destination(), Some("STORAGE"));
    assert!(coordinator.take_last_error().is_some());
    assert!(coordinator.last_error().is_none());
}

#[test]
fn test_failed_restart_keeps_active_route() {
    let mut coordinator = create_coordinator(SessionConfig::default());
    coordinator.select_destination("LAB 1").unwrap();
    coordinator.start_navigation().unwrap();
    let route = coordinator.navigation().path().map(|p| p.to_vec());

    // Walk outside the building, then ask for a new route
    coordinator.on_frame(camera_at(-5.0, -5.0));
    assert_eq!(
        coordinator.start_navigation(),
        Err(SessionError::Path(PathError::StartNotNavigable))
    );
    assert_eq!(coordinator.navigation().path().map(|p| p.to_vec()), route);
}

#[test]
fn test_restart_replans_from_tracked_position() {
    let mut coordinator = create_coordinator(SessionConfig::default());
    coordinator.select_destination("LAB 1").unwrap();
    coordinator.start_navigation().unwrap();

    // Without a heading the transform is identity, so the camera is the user
    let frame = coordinator.on_frame(camera_at(20.0, 4.0));
    assert_eq!(frame.user_position, Vec3::new(20.0, 1.6, 4.0));

    coordinator.start_navigation().unwrap();
    let path = coordinator.navigation().path().unwrap();
    // Start is projected onto the floor
    assert_eq!(path[0], Vec3::new(20.0, 0.0, 4.0));
    assert_eq!(*path.last().unwrap(), LAB_1_CENTER);
}

#[test]
fn test_start_position_override() {
    let config = SessionConfig::default().with_start_position(Vec3::new(25.0, 0.0, 4.0));
    let mut coordinator = create_coordinator(config);
    assert_eq!(coordinator.last_user_position(), Vec3::new(25.0, 0.0, 4.0));

    coordinator.select_destination("OFFICE").unwrap();
    coordinator.start_navigation().unwrap();
    let path = coordinator.navigation().path().unwrap();
    assert_eq!(path[0], Vec3::new(25.0, 0.0, 4.0));
    assert_eq!(*path.last().unwrap(), Vec3::new(24.0, 0.0, -2.0));
}

#[test]
fn test_start_at_destination_is_arrival() {
    let config = SessionConfig::default().with_start_position(LAB_1_CENTER);
    let mut coordinator = create_coordinator(config);

    coordinator.select_destination("LAB 1").unwrap();
    coordinator.start_navigation().unwrap();
    assert!(!coordinator.navigation().is_navigating());
    assert!(coordinator.navigation().segments().is_empty());
    assert_eq!(coordinator.navigation().destination(), Some("LAB 1"));
    assert!(coordinator.last_error().is_none());
}

#[test]
fn test_arriving_ends_active_route() {
    let mut coordinator = create_coordinator(SessionConfig::default());
    coordinator.select_destination("LAB 1").unwrap();
    coordinator.start_navigation().unwrap();
    assert!(coordinator.navigation().is_navigating());

    // Identity transform: the camera stands on the LAB 1 center
    coordinator.on_frame(camera_at(LAB_1_CENTER.x, LAB_1_CENTER.z));
    coordinator.start_navigation().unwrap();
    assert!(!coordinator.navigation().is_navigating());
    assert_eq!(coordinator.navigation().path(), None);
}

#[test]
fn test_queued_commands_apply_on_next_frame() {
    let mut coordinator = create_coordinator(SessionConfig::default());
    let sender = coordinator.event_sender();

    sender.send(Command::SelectDestination("LAB 2".to_string()));
    sender.send(Command::StartNavigation);
    assert!(!coordinator.navigation().is_navigating());

    let frame = coordinator.on_frame(camera_at(5.0, 4.0));
    assert!(coordinator.navigation().is_navigating());
    assert!(!frame.segments.is_empty());
    assert_eq!(frame.arrow_style.color, 0x00ff00);

    // Segments chain from the start to the destination
    let first = frame.segments[0];
    let last = frame.segments[frame.segments.len() - 1];
    assert_vec_close(first.start, Vec3::new(5.0, 0.0, 4.0));
    assert_vec_close(last.end(), Vec3::new(26.0, 0.0, 10.0));
}

#[test]
fn test_heading_burst_does_not_swallow_stop() {
    let config = SessionConfig {
        event_capacity: 4,
        ..SessionConfig::default()
    };
    let mut coordinator = create_coordinator(config);
    coordinator.select_destination("LAB 1").unwrap();
    coordinator.start_navigation().unwrap();

    let sender = coordinator.event_sender();
    sender.send(Command::StopNavigation);
    for i in 0..50 {
        sender.send(HeadingSample::new(i as f32).unwrap());
    }

    coordinator.on_frame(camera_at(5.0, 4.0));
    assert!(!coordinator.navigation().is_navigating());
    assert!(sender.dropped() > 0);
}

#[test]
fn test_queued_failure_is_recorded() {
    let mut coordinator = create_coordinator(SessionConfig::default());
    let sender = coordinator.event_sender();

    sender.send(Command::SelectDestination("ROOF".to_string()));
    coordinator.on_frame(camera_at(5.0, 4.0));

    assert_eq!(
        coordinator.last_error(),
        Some(&SessionError::InvalidDestination("ROOF".to_string()))
    );
}

#[test]
fn test_recalibrate_anchors_start_under_camera() {
    let mut coordinator = create_coordinator(SessionConfig::default());

    // No frame yet
    assert!(!coordinator.recalibrate());

    let sender = coordinator.event_sender();
    sender.send(HeadingSample::new(0.0).unwrap());
    sender.send(Command::Recalibrate);
    let frame = coordinator.on_frame(camera_at(1.0, 2.0));

    assert!(frame.transform.rotation_y.abs() < 1e-6);
    assert_vec_close(frame.transform.translation, Vec3::new(-4.0, 0.0, -2.0));
    // Standing where we recalibrated puts the user on the start point
    assert_vec_close(frame.user_position, Vec3::new(5.0, 1.6, 4.0));
}

#[test]
fn test_recalibrate_without_heading_is_skipped() {
    let mut coordinator = create_coordinator(SessionConfig::default());
    coordinator.on_frame(camera_at(1.0, 2.0));

    assert!(!coordinator.recalibrate());
    assert_eq!(coordinator.transform().translation, Vec3::ZERO);
}

#[test]
fn test_ar_lifecycle() {
    let mut coordinator = create_coordinator(SessionConfig::default());
    let (source, log) = ScriptedSource::new(true);

    coordinator.enter_ar(source).unwrap();
    assert!(coordinator.is_in_ar());
    assert!(log.borrow().attached);

    // The sensor pushes headings through the sender it was given
    let sensor_events = log.borrow().events.clone().unwrap();
    sensor_events.send(HeadingSample::from_device_orientation(None, Some(270.0)).unwrap());
    // Rotated a quarter turn, this camera stands on the start point
    let frame = coordinator.on_frame(camera_at(4.0, -5.0));
    assert_vec_close(frame.user_position, Vec3::new(5.0, 1.6, 4.0));
    assert_eq!(coordinator.heading().map(|h| h.degrees()), Some(90.0));
    assert!((frame.transform.rotation_y - std::f32::consts::FRAC_PI_2).abs() < 1e-5);

    coordinator.select_destination("LAB 1").unwrap();
    coordinator.start_navigation().unwrap();

    sensor_events.send(Command::ExitAr);
    let frame = coordinator.on_frame(camera_at(4.0, -5.0));
    assert!(!coordinator.is_in_ar());
    assert!(!log.borrow().attached);
    assert_eq!(log.borrow().detach_calls, 1);
    assert!(!coordinator.navigation().is_navigating());
    assert!(frame.segments.is_empty());
}

#[test]
fn test_reentering_ar_resets_alignment() {
    let mut coordinator = create_coordinator(SessionConfig::default());
    let (source, _log) = ScriptedSource::new(true);
    coordinator.enter_ar(source).unwrap();
    coordinator.on_heading(HeadingSample::new(45.0).unwrap());
    assert!(coordinator.transform().rotation_y > 0.0);

    coordinator.exit_ar();
    let (source, _log) = ScriptedSource::new(true);
    coordinator.enter_ar(source).unwrap();
    assert_eq!(coordinator.transform().rotation_y, 0.0);
    assert_eq!(coordinator.heading(), None);
}

#[test]
fn test_permission_denied_blocks_ar() {
    let mut coordinator = create_coordinator(SessionConfig::default());
    let (source, log) = ScriptedSource::new(false);

    assert_eq!(
        coordinator.enter_ar(source),
        Err(SessionError::SensorPermissionDenied)
    );
    assert!(!coordinator.is_in_ar());
    assert!(!log.borrow().attached);
    assert_eq!(
        coordinator.last_error(),
        Some(&SessionError::SensorPermissionDenied)
    );
}

#[test]
fn test_invalid_plan_is_fatal() {
    let plan = create_plan(Vec::new());
    let result =
        SessionCoordinator::from_floor_plan(plan, &NavMeshConfig::default(), SessionConfig::default());
    assert!(matches!(
        result,
        Err(wayfind_common::Error::InvalidFloorPlan(_))
    ));
}

#[test]
fn test_scene_matches_plan() {
    let coordinator = create_coordinator(SessionConfig::default().with_label_height(3.0));
    let scene = coordinator.scene();

    assert_eq!(scene.walls.len(), 2);
    assert_eq!(scene.labels[2].text, "LAB 1");
    assert_eq!(scene.labels[2].position, Vec3::new(18.0, 3.0, 10.0));
}
