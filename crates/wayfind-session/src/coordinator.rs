//! Single owner of navigation and alignment state
//!
//! [`SessionCoordinator`] is the only writer of the [`NavigationSession`] and the
//! model transform. Producers on other threads send [`SessionEvent`]s through an
//! [`EventSender`]; the queues are drained at the start of every frame.

use glam::Vec3;
use wayfind_align::{AlignOutcome, CameraPose, HeadingSample, ModelTransform, PoseRegistrar};
use wayfind_mesh::{BuildContext, FloorPlan, NavMeshBuilder, NavMeshConfig};
use wayfind_query::{PathPlanner, PathProvider};

use crate::{
    event_channel, ArSession, Command, EventReceiver, EventSender, NavigationSession,
    OrientationSource, RenderFrame, SceneDescription, SessionConfig, SessionError, SessionEvent,
    SessionResult,
};

/// A selectable destination room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    /// Exact room name used for selection
    pub name: String,
    /// Name with line breaks replaced by spaces
    pub label: String,
}

pub struct SessionCoordinator {
    plan: FloorPlan,
    planner: Box<dyn PathProvider>,
    registrar: PoseRegistrar,
    navigation: NavigationSession,
    ar_session: Option<ArSession>,
    sender: EventSender,
    receiver: EventReceiver,
    config: SessionConfig,
    scene: SceneDescription,
    last_camera: Option<CameraPose>,
    last_error: Option<SessionError>,
}

impl SessionCoordinator {
    /// Creates a coordinator over an already built route provider
    pub fn new(plan: FloorPlan, planner: Box<dyn PathProvider>, config: SessionConfig) -> Self {
        let floor = config.floor_height;
        let model_start = plan.start_point(floor).unwrap_or(Vec3::new(0.0, floor, 0.0));
        let mut registrar = PoseRegistrar::new(model_start, plan.forward_direction());
        if let Some(position) = config.start_position {
            registrar = registrar.with_user_position(position);
        }

        let (sender, receiver) = event_channel(config.event_capacity);
        let scene = SceneDescription::from_floor_plan(&plan, &config);

        Self {
            plan,
            planner,
            registrar,
            navigation: NavigationSession::new(),
            ar_session: None,
            sender,
            receiver,
            config,
            scene,
            last_camera: None,
            last_error: None,
        }
    }

    /// Builds the navigation mesh for `plan` and wraps it in a coordinator
    ///
    /// The mesh is built on the session's floor height. Build failures are fatal.
    pub fn from_floor_plan(
        plan: FloorPlan,
        mesh_config: &NavMeshConfig,
        config: SessionConfig,
    ) -> wayfind_common::Result<Self> {
        let mesh_config = mesh_config.clone().with_floor_height(config.floor_height);
        let mut ctx = BuildContext::new();
        let nav_mesh = NavMeshBuilder::new(mesh_config).build(&plan, &mut ctx)?;
        ctx.log_timer_summary();

        Ok(Self::new(plan, Box::new(PathPlanner::new(nav_mesh)), config))
    }

    /// A handle for queueing events from sensor or UI code
    pub fn event_sender(&self) -> EventSender {
        self.sender.clone()
    }

    pub fn floor_plan(&self) -> &FloorPlan {
        &self.plan
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn scene(&self) -> &SceneDescription {
        &self.scene
    }

    pub fn navigation(&self) -> &NavigationSession {
        &self.navigation
    }

    pub fn transform(&self) -> &ModelTransform {
        self.registrar.transform()
    }

    pub fn heading(&self) -> Option<HeadingSample> {
        self.registrar.heading()
    }

    /// Latest user position in model space
    pub fn last_user_position(&self) -> Vec3 {
        self.registrar.last_user_position()
    }

    /// Most recent failure from a queued or handled command
    pub fn last_error(&self) -> Option<&SessionError> {
        self.last_error.as_ref()
    }

    pub fn take_last_error(&mut self) -> Option<SessionError> {
        self.last_error.take()
    }

    /// Rooms in floor-plan order
    pub fn destinations(&self) -> Vec<Destination> {
        self.plan
            .rooms
            .iter()
            .map(|room| Destination {
                name: room.name.clone(),
                label: room.display_name(),
            })
            .collect()
    }

    pub fn is_in_ar(&self) -> bool {
        self.ar_session.is_some()
    }

    /// Enters AR with `source` as the heading producer
    ///
    /// A denied permission leaves the coordinator outside AR. Entering again
    /// replaces the previous session.
    pub fn enter_ar(&mut self, source: Box<dyn OrientationSource>) -> SessionResult<()> {
        if let Some(previous) = self.ar_session.take() {
            previous.exit();
        }

        match ArSession::enter(source, self.sender.clone()) {
            Ok(session) => {
                self.registrar.begin_session();
                self.ar_session = Some(session);
                Ok(())
            }
            Err(e) => {
                self.last_error = Some(e.clone());
                Err(e)
            }
        }
    }

    /// Stops navigation and releases the sensor subscription
    pub fn exit_ar(&mut self) {
        self.navigation.stop();
        if let Some(session) = self.ar_session.take() {
            session.exit();
        }
    }

    /// Applies a user command, recording any failure as the last error
    pub fn handle(&mut self, command: Command) -> SessionResult<()> {
        let result = match command {
            Command::SelectDestination(name) => self.select_destination(&name),
            Command::StartNavigation => self.start_navigation(),
            Command::StopNavigation => {
                self.stop_navigation();
                Ok(())
            }
            Command::Recalibrate => {
                self.recalibrate();
                Ok(())
            }
            Command::ExitAr => {
                self.exit_ar();
                Ok(())
            }
        };

        if let Err(e) = &result {
            log::warn!("Command failed: {}", e);
            self.last_error = Some(e.clone());
        }
        result
    }

    /// Chooses the destination room by exact name
    pub fn select_destination(&mut self, name: &str) -> SessionResult<()> {
        if self.navigation.is_navigating() {
            return Err(SessionError::DestinationLocked);
        }
        if self.plan.room(name).is_none() {
            return Err(SessionError::InvalidDestination(name.to_string()));
        }

        self.navigation.select(name);
        log::debug!("Destination selected: {:?}", name);
        Ok(())
    }

    /// Plans a route from the last user position to the selected destination
    ///
    /// The new route replaces any active one. When the user already stands at
    /// the destination navigation ends instead. On failure the session is left
    /// unchanged.
    pub fn start_navigation(&mut self) -> SessionResult<()> {
        let name = self
            .navigation
            .destination()
            .ok_or(SessionError::NoDestination)?
            .to_string();
        let floor = self.config.floor_height;
        let destination = self
            .plan
            .room_center(&name, floor)
            .ok_or_else(|| SessionError::InvalidDestination(name.clone()))?;

        let user = self.registrar.last_user_position();
        let start = Vec3::new(user.x, floor, user.z);

        let path = self.planner.find_path(start, destination)?;
        if path.len() < 2 {
            log::info!("Already at {:?}", name);
            self.navigation.stop();
            return Ok(());
        }

        log::info!("Navigating to {:?}: {} waypoints", name, path.len());
        self.navigation.begin(path);
        Ok(())
    }

    pub fn stop_navigation(&mut self) {
        if self.navigation.is_navigating() {
            log::info!("Navigation stopped");
        }
        self.navigation.stop();
    }

    /// Re-anchors the model under the most recent camera pose
    ///
    /// Returns `false` when no frame or no heading has been received yet.
    pub fn recalibrate(&mut self) -> bool {
        let Some(camera) = self.last_camera else {
            log::debug!("Recalibration skipped: no camera frame yet");
            return false;
        };
        self.registrar.recalibrate(&camera).is_aligned()
    }

    pub fn on_heading(&mut self, sample: HeadingSample) -> AlignOutcome {
        self.registrar.on_heading(sample)
    }

    /// Advances one frame
    ///
    /// Queued events are applied against this frame's camera pose before the
    /// user position is tracked.
    pub fn on_frame(&mut self, camera: CameraPose) -> RenderFrame {
        self.last_camera = Some(camera);
        self.drain_events();

        let user_position = self.registrar.track(&camera);
        RenderFrame {
            transform: *self.registrar.transform(),
            segments: self.navigation.segments().to_vec(),
            arrow_style: self.config.arrow_style,
            user_position,
        }
    }

    /// Applies the events pending at the start of the call
    ///
    /// Heading samples are applied before commands; each kind keeps its
    /// arrival order. Events queued while draining wait for the next call.
    pub fn drain_events(&mut self) -> usize {
        let events = self.receiver.try_recv_batch(self.receiver.len());
        let count = events.len();
        for event in events {
            match event {
                SessionEvent::Heading(sample) => {
                    self.on_heading(sample);
                }
                SessionEvent::Command(command) => {
                    // Failures are kept in last_error
                    let _ = self.handle(command);
                }
            }
        }
        count
    }
}

impl std::fmt::Debug for SessionCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCoordinator")
            .field("navigation", &self.navigation)
            .field("transform", self.registrar.transform())
            .field("in_ar", &self.ar_session.is_some())
            .field("last_error", &self.last_error)
            .finish_non_exhaustive()
    }
}
