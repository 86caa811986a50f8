use super::{GoalSource, PoseError, TransformBuffer, VehiclePoseSource, goal_channel};
use crate::flight_control::common::{LoopClock, Pose};
use chrono::{DateTime, TimeDelta, TimeZone, Utc};

const WORLD: &str = "/world";
const FRAME: &str = "/crazyflie/base_link";

fn t(ms: i64) -> DateTime<Utc> { Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap() + TimeDelta::milliseconds(ms) }

fn buffer() -> TransformBuffer { TransformBuffer::new(TimeDelta::milliseconds(500)) }

#[test]
fn test_lookup_returns_sample_at_or_before() {
    let mut buf = buffer();
    buf.insert(WORLD, FRAME, t(0), Pose::at_height(0.0, 0.0, 0.1));
    buf.insert(WORLD, FRAME, t(100), Pose::at_height(0.0, 0.0, 0.2));
    buf.insert(WORLD, FRAME, t(200), Pose::at_height(0.0, 0.0, 0.3));

    let sample = buf.vehicle_pose(WORLD, FRAME, t(150)).unwrap();
    assert_eq!(sample.stamp, t(100));
    assert!((sample.pose.z() - 0.2).abs() < 1e-12);

    let exact = buf.vehicle_pose(WORLD, FRAME, t(200)).unwrap();
    assert_eq!(exact.stamp, t(200));
}

#[test]
fn test_out_of_order_insert_is_sorted() {
    let mut buf = buffer();
    buf.insert(WORLD, FRAME, t(200), Pose::at_height(0.0, 0.0, 0.3));
    buf.insert(WORLD, FRAME, t(100), Pose::at_height(0.0, 0.0, 0.2));
    assert_eq!(buf.vehicle_pose(WORLD, FRAME, t(250)).unwrap().stamp, t(200));
    assert_eq!(buf.vehicle_pose(WORLD, FRAME, t(150)).unwrap().stamp, t(100));
}

#[test]
fn test_unknown_frame_pair() {
    let buf = buffer();
    assert!(matches!(buf.vehicle_pose(WORLD, FRAME, t(0)), Err(PoseError::UnknownFrames { .. })));
}

#[test]
fn test_no_sample_before_request() {
    let mut buf = buffer();
    buf.insert(WORLD, FRAME, t(100), Pose::default());
    assert_eq!(buf.vehicle_pose(WORLD, FRAME, t(50)), Err(PoseError::NoSampleBefore(t(50))));
}

#[test]
fn test_stale_sample_rejected() {
    let mut buf = buffer();
    buf.insert(WORLD, FRAME, t(0), Pose::default());
    assert!(buf.vehicle_pose(WORLD, FRAME, t(500)).is_ok());
    assert_eq!(
        buf.vehicle_pose(WORLD, FRAME, t(501)),
        Err(PoseError::Stale { age: TimeDelta::milliseconds(501) })
    );
}

#[test]
fn test_history_is_bounded() {
    let mut buf = buffer();
    for i in 0..200 {
        buf.insert(WORLD, FRAME, t(i * 10), Pose::default());
    }
    // The oldest samples were evicted.
    assert!(matches!(buf.vehicle_pose(WORLD, FRAME, t(500)), Err(PoseError::NoSampleBefore(_))));
    assert!(buf.vehicle_pose(WORLD, FRAME, t(1990)).is_ok());
}

#[tokio::test(start_paused = true)]
async fn test_goal_channel_stamps_and_replaces() {
    let clock = LoopClock::pinned_at(t(0));
    let (publisher, monitor) = goal_channel(clock);
    assert!(monitor.goal().is_none());

    publisher.publish(Pose::at_height(0.1, 0.0, 0.7));
    tokio::time::advance(std::time::Duration::from_millis(250)).await;
    publisher.publish(Pose::at_height(0.2, 0.0, 0.7));

    let goal = monitor.goal().unwrap();
    assert!((goal.pose.x() - 0.2).abs() < 1e-12);
    assert_eq!(goal.received_at, t(250));
}
