//! Engine: routes host input through the tools into the store, and fans every
//! resulting change out to persistence and to both views.
//!
//! [`EngineCore`] holds all editor logic and is generic over the two
//! rendering surfaces, so it runs headless in tests and in the command-line
//! binary. [`Engine`] binds it to a browser canvas and `localStorage`.

use tracing::{debug, info, warn};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::camera::{Camera, OrbitCamera};
use crate::config::EditorConfig;
use crate::doc::{Change, DocError, DocStore, Entity, ObjectId, Patch, Terrain, TerrainPatch};
use crate::geom::Vertex;
use crate::hit::{Hit, HitPart, hit_test};
use crate::input::{Button, InputState, Key, Modifiers, Tool, UiState, WheelDelta};
use crate::render::{self, CanvasSurface};
use crate::storage::{LocalStorage, Persistence, ViewMode};
use crate::tools::Session;
use crate::tools::edit::{self, ResizeDirection, TerrainEditor, bounds_patch, resize_bounds};
use crate::tools::terrain::TerrainSession;
use crate::tools::wall::WallSession;
use crate::view::View;
use crate::view::plan::{PlanView, Surface2d};
use crate::view::scene::{MemorySurface3d, SceneView, Surface3d};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

const DEFAULT_CURSOR: &str = "default";
const MOVE_CURSOR: &str = "move";
const CROSSHAIR_CURSOR: &str = "crosshair";

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ObjectCreated(Entity),
    ObjectUpdated(Entity),
    ObjectDeleted {
        id: ObjectId,
    },
    /// A dimension label was clicked; the host should ask for a new length.
    EdgeSizeRequested {
        id: ObjectId,
        edge_index: usize,
        value_cm: f64,
        directions: [ResizeDirection; 2],
    },
    /// Guidance text to show, or `None` to hide it.
    Guidance(Option<String>),
    SetCursor(String),
    /// A message for the user, e.g. a failed save or a rejected edit.
    Notify(String),
    ViewModeChanged(ViewMode),
    RenderNeeded,
}

/// Core engine state: all logic that doesn't depend on the browser.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
pub struct EngineCore<P: Surface2d, S: Surface3d> {
    doc: DocStore,
    persistence: Persistence,
    pub camera: Camera,
    orbit: OrbitCamera,
    ui: UiState,
    input: InputState,
    session: Option<Session>,
    editor: Option<TerrainEditor>,
    plan: PlanView<P>,
    scene: SceneView<S>,
    config: EditorConfig,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub dpr: f64,
}

impl<P: Surface2d, S: Surface3d> EngineCore<P, S> {
    /// Load the saved plan and view mode, and build both views from them.
    #[must_use]
    pub fn new(persistence: Persistence, plan_surface: P, scene_surface: S) -> Self {
        Self::with_config(persistence, plan_surface, scene_surface, EditorConfig::default())
    }

    #[must_use]
    pub fn with_config(persistence: Persistence, plan_surface: P, scene_surface: S, config: EditorConfig) -> Self {
        let doc = persistence.load_schema_or_default();
        let view_mode = persistence.load_view_mode();

        let mut plan = PlanView::new(plan_surface);
        plan.rebuild(&doc);
        let mut scene = SceneView::new(scene_surface);
        scene.rebuild(&doc);
        let orbit = OrbitCamera::default();
        scene.surface_mut().set_camera(&orbit);

        info!(entities = doc.len(), %view_mode, "editor ready");
        Self {
            doc,
            persistence,
            camera: Camera { zoom: config.initial_zoom, ..Camera::default() },
            orbit,
            ui: UiState { view_mode, ..UiState::default() },
            input: InputState::Idle,
            session: None,
            editor: None,
            plan,
            scene,
            config,
            viewport_width: 0.0,
            viewport_height: 0.0,
            dpr: 1.0,
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn doc(&self) -> &DocStore {
        &self.doc
    }

    #[must_use]
    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    #[must_use]
    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// The currently selected entity, if any.
    #[must_use]
    pub fn selection(&self) -> Option<ObjectId> {
        self.ui.selected_id
    }

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    #[must_use]
    pub fn orbit(&self) -> OrbitCamera {
        self.orbit
    }

    #[must_use]
    pub fn plan(&self) -> &PlanView<P> {
        &self.plan
    }

    #[must_use]
    pub fn scene(&self) -> &SceneView<S> {
        &self.scene
    }

    /// The 2D surface, for hosts that need to acknowledge a repaint.
    pub fn plan_surface_mut(&mut self) -> &mut P {
        self.plan.surface_mut()
    }

    /// The running drawing session, if any.
    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Dimension labels of the selected terrain, if any.
    #[must_use]
    pub fn editor(&self) -> Option<&TerrainEditor> {
        self.editor.as_ref()
    }

    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Zoom of the visible view relative to its starting zoom.
    #[must_use]
    pub fn zoom_readout(&self) -> f64 {
        match self.ui.view_mode {
            ViewMode::TwoD => self.camera.zoom_readout(self.config.initial_zoom),
            ViewMode::ThreeD => self.orbit.zoom_readout(),
        }
    }

    // --- Viewport ---

    /// Update viewport dimensions and device pixel ratio.
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.viewport_width = width_css;
        self.viewport_height = height_css;
        self.dpr = dpr;
    }

    fn viewport_center(&self) -> Vertex {
        Vertex::new(self.viewport_width / 2.0, self.viewport_height / 2.0)
    }

    pub fn zoom_in(&mut self) -> Vec<Action> {
        let center = self.viewport_center();
        match self.ui.view_mode {
            ViewMode::TwoD => self.camera.zoom_in(center),
            ViewMode::ThreeD => {
                self.orbit.zoom_in();
                self.scene.surface_mut().set_camera(&self.orbit);
            }
        }
        vec![Action::RenderNeeded]
    }

    pub fn zoom_out(&mut self) -> Vec<Action> {
        let center = self.viewport_center();
        match self.ui.view_mode {
            ViewMode::TwoD => self.camera.zoom_out(center),
            ViewMode::ThreeD => {
                self.orbit.zoom_out();
                self.scene.surface_mut().set_camera(&self.orbit);
            }
        }
        vec![Action::RenderNeeded]
    }

    /// Switch between the plan and the 3D view, remembering the choice.
    pub fn set_view_mode(&mut self, mode: ViewMode) -> Vec<Action> {
        if self.ui.view_mode == mode {
            return Vec::new();
        }
        let mut actions = self.finish_session(false);
        self.abort_gesture();
        self.ui.view_mode = mode;
        if let Err(e) = self.persistence.save_view_mode(mode) {
            warn!(error = %e, "view mode not saved");
            actions.push(Action::Notify(format!("Could not save the view mode: {e}")));
        }
        actions.push(Action::ViewModeChanged(mode));
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Tools ---

    /// Activate a tool. Choosing `Select` cancels any drawing session.
    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        match tool {
            Tool::Select => self.finish_session(false),
            Tool::Terrain => self.begin_terrain(self.ui.pointer),
            Tool::Wall => self.begin_wall(),
        }
    }

    /// Start placing a terrain with its ghost at `at` (the origin if unknown).
    pub fn begin_terrain(&mut self, at: Option<Vertex>) -> Vec<Action> {
        if !self.can_draw() {
            return Vec::new();
        }
        let mut actions = self.reset_for_session();
        let session = TerrainSession::begin(self.plan.surface_mut(), at.unwrap_or_default(), &self.config);
        actions.extend(self.enter(Session::Terrain(session), DEFAULT_CURSOR));
        actions
    }

    /// Start drawing a wall chain. Existing entities stop reacting to the pointer.
    pub fn begin_wall(&mut self) -> Vec<Action> {
        if !self.can_draw() {
            return Vec::new();
        }
        let mut actions = self.reset_for_session();
        self.plan.set_interactive_all(false);
        actions.extend(self.enter(Session::Wall(WallSession::new(&self.config)), CROSSHAIR_CURSOR));
        actions
    }

    fn can_draw(&self) -> bool {
        if self.ui.view_mode == ViewMode::ThreeD {
            debug!("drawing tools need the plan view");
            return false;
        }
        true
    }

    fn reset_for_session(&mut self) -> Vec<Action> {
        let actions = self.finish_session(false);
        self.abort_gesture();
        self.select(None);
        actions
    }

    fn enter(&mut self, session: Session, cursor: &str) -> Vec<Action> {
        let guidance = session.guidance().to_owned();
        self.ui.tool = session.tool();
        self.ui.guidance = Some(guidance.clone());
        self.session = Some(session);
        vec![Action::Guidance(Some(guidance)), Action::SetCursor(cursor.to_owned()), Action::RenderNeeded]
    }

    /// The single exit path of every drawing session.
    fn finish_session(&mut self, commit: bool) -> Vec<Action> {
        let Some(session) = self.session.take() else {
            return Vec::new();
        };
        let entities = session.finish(self.plan.surface_mut(), commit);
        self.plan.set_interactive_all(true);
        self.ui.tool = Tool::Select;
        self.ui.guidance = None;

        let mut actions = vec![Action::Guidance(None), Action::SetCursor(DEFAULT_CURSOR.to_owned())];
        if !entities.is_empty() {
            actions.extend(self.add(entities));
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Edits ---

    /// Set one edge of a terrain to `cm`, moving the side chosen by `direction`.
    pub fn apply_edge_length(
        &mut self,
        id: &ObjectId,
        edge_index: usize,
        direction: ResizeDirection,
        cm: f64,
    ) -> Vec<Action> {
        let Some(terrain) = self.doc.terrain(id) else {
            warn!(%id, "edge length for unknown terrain ignored");
            return Vec::new();
        };
        match edit::edge_length_patch(terrain, edge_index, direction, cm) {
            Ok(patch) => self.update(id, &patch.into()),
            Err(e) => Self::reject(&e),
        }
    }

    /// Delete the selected entity and everything drawn for it.
    pub fn delete_selected(&mut self) -> Vec<Action> {
        let Some(id) = self.ui.selected_id else {
            return Vec::new();
        };
        self.input = InputState::Idle;
        match self.doc.delete_entity(&id) {
            Some(change) => self.commit(&[change]),
            None => Vec::new(),
        }
    }

    fn add(&mut self, entities: Vec<Entity>) -> Vec<Action> {
        match self.doc.add_entities(entities) {
            Ok(changes) => self.commit(&changes),
            Err(e) => Self::reject(&e),
        }
    }

    fn update(&mut self, id: &ObjectId, patch: &Patch) -> Vec<Action> {
        match self.doc.update_entity(id, patch) {
            Ok(Some(change)) => self.commit(&[change]),
            Ok(None) => Vec::new(),
            Err(e) => {
                self.restore(id);
                Self::reject(&e)
            }
        }
    }

    /// Persist, then update both views, then report. Every mutation ends here.
    fn commit(&mut self, changes: &[Change]) -> Vec<Action> {
        let mut actions = Vec::with_capacity(changes.len() + 2);
        if let Err(e) = self.persistence.save_schema(&self.doc) {
            warn!(error = %e, "plan not saved");
            actions.push(Action::Notify(format!("Could not save the plan: {e}")));
        }
        for change in changes {
            self.plan.apply(&self.doc, change);
            self.scene.apply(&self.doc, change);
            match change {
                Change::Added(id) => {
                    if let Some(entity) = self.doc.get(id) {
                        actions.push(Action::ObjectCreated(entity.clone()));
                    }
                }
                Change::Updated(id) => {
                    if let Some(entity) = self.doc.get(id) {
                        actions.push(Action::ObjectUpdated(entity.clone()));
                    }
                    self.sync_editor(id);
                }
                Change::Removed(id) => {
                    if self.ui.selected_id == Some(*id) {
                        self.select(None);
                    }
                    actions.push(Action::ObjectDeleted { id: *id });
                }
            }
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    fn reject(err: &DocError) -> Vec<Action> {
        warn!(error = %err, "edit rejected");
        vec![Action::Notify(err.to_string()), Action::RenderNeeded]
    }

    // --- Selection ---

    fn select(&mut self, id: Option<ObjectId>) {
        if self.ui.selected_id == id {
            return;
        }
        if let Some(editor) = self.editor.take() {
            editor.detach(self.plan.surface_mut());
        }
        self.ui.selected_id = id;
        self.plan.set_selected(&self.doc, id);
        if let Some(terrain) = id.and_then(|id| self.doc.terrain(&id)) {
            self.editor = Some(TerrainEditor::attach(self.plan.surface_mut(), terrain));
        }
    }

    fn sync_editor(&mut self, id: &ObjectId) {
        if let (Some(editor), Some(terrain)) = (&mut self.editor, self.doc.terrain(id)) {
            if editor.id() == *id {
                editor.sync(self.plan.surface_mut(), &terrain.edges());
            }
        }
    }

    /// Put an entity's proxy and labels back to the stored geometry.
    fn restore(&mut self, id: &ObjectId) {
        self.plan.refresh(&self.doc, id);
        if let Some(editor) = &mut self.editor {
            editor.set_visible(self.plan.surface_mut(), true);
        }
        self.sync_editor(id);
    }

    fn abort_gesture(&mut self) -> bool {
        let target = std::mem::take(&mut self.input).transform_target();
        if let Some(id) = target {
            self.restore(&id);
        }
        target.is_some()
    }

    // --- Input events ---

    fn track_pointer(&mut self, screen: Vertex) -> Vertex {
        let world = self.camera.screen_to_world(screen);
        self.ui.pointer = Some(world);
        world
    }

    pub fn on_pointer_down(&mut self, screen: Vertex, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        if self.ui.view_mode != ViewMode::TwoD {
            return Vec::new();
        }
        let world = self.track_pointer(screen);
        match button {
            Button::Middle => {
                self.input = InputState::Panning { last_screen: screen };
                return Vec::new();
            }
            Button::Secondary => return Vec::new(),
            Button::Primary => {}
        }
        // Drawing tools act on release.
        if self.session.is_some() {
            return Vec::new();
        }

        let label = self
            .editor
            .as_ref()
            .and_then(|e| e.label_at(world).map(|l| (e.id(), l.edge_index, l.value_cm)));
        if let Some((id, edge_index, value_cm)) = label {
            return vec![Action::EdgeSizeRequested {
                id,
                edge_index,
                value_cm,
                directions: ResizeDirection::choices(edge_index),
            }];
        }

        match hit_test(world, &self.doc, &self.camera, self.ui.selected_id) {
            Some(Hit { object_id, part: HitPart::ResizeHandle(side) }) => {
                let Some(orig) = self.doc.terrain(&object_id).map(|t| t.bounds()) else {
                    return Vec::new();
                };
                self.input = InputState::ResizingTerrain { id: object_id, side, start_world: world, orig, bounds: orig };
                vec![Action::SetCursor(side.cursor().to_owned())]
            }
            Some(Hit { object_id, part: HitPart::Body }) => {
                self.select(Some(object_id));
                let mut actions = vec![Action::RenderNeeded];
                if let Some(center) = self.doc.terrain(&object_id).map(|t| t.center) {
                    self.input =
                        InputState::MovingTerrain { id: object_id, start_world: world, orig_center: center, center };
                    if let Some(editor) = &mut self.editor {
                        editor.set_visible(self.plan.surface_mut(), false);
                    }
                    actions.push(Action::SetCursor(MOVE_CURSOR.to_owned()));
                }
                actions
            }
            None => {
                if self.ui.selected_id.is_some() {
                    self.select(None);
                } else {
                    self.input = InputState::Panning { last_screen: screen };
                }
                vec![Action::RenderNeeded]
            }
        }
    }

    pub fn on_pointer_move(&mut self, screen: Vertex, _modifiers: Modifiers) -> Vec<Action> {
        if self.ui.view_mode != ViewMode::TwoD {
            return Vec::new();
        }
        let world = self.track_pointer(screen);

        if let InputState::Panning { last_screen } = &mut self.input {
            self.camera.pan_by(screen.x - last_screen.x, screen.y - last_screen.y);
            *last_screen = screen;
            return vec![Action::RenderNeeded];
        }

        if let Some(session) = &mut self.session {
            let surface = self.plan.surface_mut();
            match session {
                Session::Terrain(s) => s.move_to(surface, world),
                Session::Wall(s) => s.pointer_move(surface, world),
            }
            return vec![Action::RenderNeeded];
        }

        match &mut self.input {
            InputState::Idle | InputState::Panning { .. } => Vec::new(),
            InputState::MovingTerrain { id, start_world, orig_center, center } => {
                *center = orig_center.offset(world.x - start_world.x, world.y - start_world.y);
                if let Some(terrain) = self.doc.terrain(id) {
                    let moved = Terrain { center: *center, ..terrain.clone() };
                    self.plan.preview_terrain(id, &moved.bounds());
                }
                vec![Action::RenderNeeded]
            }
            InputState::ResizingTerrain { id, side, start_world, orig, bounds } => {
                let delta = Vertex::new(world.x - start_world.x, world.y - start_world.y);
                *bounds = resize_bounds(orig, *side, delta);
                self.plan.preview_terrain(id, bounds);
                if let Some(editor) = &mut self.editor {
                    editor.sync(self.plan.surface_mut(), &bounds.outline());
                }
                vec![Action::RenderNeeded]
            }
        }
    }

    pub fn on_pointer_up(&mut self, screen: Vertex, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        if self.ui.view_mode != ViewMode::TwoD {
            return Vec::new();
        }
        let world = self.track_pointer(screen);

        if button == Button::Primary {
            match &mut self.session {
                Some(Session::Terrain(s)) => {
                    s.move_to(self.plan.surface_mut(), world);
                    return self.finish_session(true);
                }
                Some(Session::Wall(s)) => {
                    s.click(self.plan.surface_mut(), world);
                    return vec![Action::RenderNeeded];
                }
                None => {}
            }
        }

        match std::mem::take(&mut self.input) {
            InputState::Idle | InputState::Panning { .. } => Vec::new(),
            InputState::MovingTerrain { id, orig_center, center, .. } => {
                if let Some(editor) = &mut self.editor {
                    editor.set_visible(self.plan.surface_mut(), true);
                }
                let mut actions = vec![Action::SetCursor(DEFAULT_CURSOR.to_owned())];
                if center == orig_center {
                    actions.push(Action::RenderNeeded);
                } else {
                    let patch = TerrainPatch { center: Some(center), ..TerrainPatch::default() };
                    actions.extend(self.update(&id, &patch.into()));
                }
                actions
            }
            InputState::ResizingTerrain { id, orig, bounds, .. } => {
                let mut actions = vec![Action::SetCursor(DEFAULT_CURSOR.to_owned())];
                if bounds == orig {
                    actions.push(Action::RenderNeeded);
                } else {
                    actions.extend(self.update(&id, &bounds_patch(&bounds).into()));
                }
                actions
            }
        }
    }

    pub fn on_wheel(&mut self, screen: Vertex, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        match self.ui.view_mode {
            ViewMode::TwoD => self.camera.wheel(screen, delta, modifiers),
            ViewMode::ThreeD => {
                if delta.dy < 0.0 {
                    self.orbit.zoom_in();
                } else if delta.dy > 0.0 {
                    self.orbit.zoom_out();
                }
                self.scene.surface_mut().set_camera(&self.orbit);
            }
        }
        vec![Action::RenderNeeded]
    }

    pub fn on_key_down(&mut self, key: Key, modifiers: Modifiers) -> Vec<Action> {
        if key.is_escape() {
            return self.escape();
        }
        if key.is_enter() {
            if matches!(self.session, Some(Session::Wall(_))) {
                return self.finish_session(true);
            }
            return Vec::new();
        }
        if self.session.is_some() {
            return Vec::new();
        }
        if key.is_delete() {
            return self.delete_selected();
        }
        if modifiers.ctrl || modifiers.meta || modifiers.alt {
            return Vec::new();
        }
        match Tool::from_hotkey(&key) {
            Some(tool) => self.set_tool(tool),
            None => Vec::new(),
        }
    }

    fn escape(&mut self) -> Vec<Action> {
        if self.session.is_some() {
            return self.finish_session(false);
        }
        if self.abort_gesture() {
            return vec![Action::SetCursor(DEFAULT_CURSOR.to_owned()), Action::RenderNeeded];
        }
        if self.ui.selected_id.is_some() {
            self.select(None);
            return vec![Action::RenderNeeded];
        }
        Vec::new()
    }
}

/// The full browser engine. Wraps `EngineCore` and owns the canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    pub core: EngineCore<CanvasSurface, MemorySurface3d>,
}

impl Engine {
    /// Create an engine bound to the given canvas, persisting to `localStorage`.
    ///
    /// Without `localStorage` the editor still works but nothing is saved.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        let persistence = match LocalStorage::open() {
            Ok(store) => Persistence::new(Box::new(store)),
            Err(e) => {
                warn!(error = %e, "changes will not be saved");
                Persistence::in_memory()
            }
        };
        Self { canvas, core: EngineCore::new(persistence, CanvasSurface::new(), MemorySurface3d::new()) }
    }

    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.core.set_viewport(width_css, height_css, dpr);
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen: Vertex, button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_down(screen, button, modifiers)
    }

    pub fn on_pointer_move(&mut self, screen: Vertex, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_move(screen, modifiers)
    }

    pub fn on_pointer_up(&mut self, screen: Vertex, button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_up(screen, button, modifiers)
    }

    pub fn on_wheel(&mut self, screen: Vertex, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_wheel(screen, delta, modifiers)
    }

    pub fn on_key_down(&mut self, key: Key, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_key_down(key, modifiers)
    }

    // --- Toolbar ---

    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        self.core.set_tool(tool)
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) -> Vec<Action> {
        self.core.set_view_mode(mode)
    }

    pub fn zoom_in(&mut self) -> Vec<Action> {
        self.core.zoom_in()
    }

    pub fn zoom_out(&mut self) -> Vec<Action> {
        self.core.zoom_out()
    }

    pub fn apply_edge_length(
        &mut self,
        id: &ObjectId,
        edge_index: usize,
        direction: ResizeDirection,
        cm: f64,
    ) -> Vec<Action> {
        self.core.apply_edge_length(id, edge_index, direction, cm)
    }

    pub fn delete_selected(&mut self) -> Vec<Action> {
        self.core.delete_selected()
    }

    // --- Render ---

    /// Paint the plan if a repaint was requested. The 3D view is drawn by the
    /// host from [`EngineCore::scene`].
    ///
    /// # Errors
    ///
    /// Returns `Err` if the 2D context is unavailable or a `Canvas2D` call fails.
    pub fn render(&mut self) -> Result<(), JsValue> {
        if self.core.ui().view_mode != ViewMode::TwoD || !self.core.plan().surface().render_pending() {
            return Ok(());
        }
        let ctx = self
            .canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        let core = &self.core;
        render::draw(
            &ctx,
            core.plan().surface().retained(),
            &core.camera,
            core.viewport_width,
            core.viewport_height,
            core.dpr,
        )?;
        self.core.plan_surface_mut().mark_rendered();
        Ok(())
    }

    // --- Delegated queries ---

    #[must_use]
    pub fn selection(&self) -> Option<ObjectId> {
        self.core.selection()
    }

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.core.camera()
    }

    #[must_use]
    pub fn object(&self, id: &ObjectId) -> Option<&Entity> {
        self.core.doc().get(id)
    }

    #[must_use]
    pub fn zoom_readout(&self) -> f64 {
        self.core.zoom_readout()
    }
}
