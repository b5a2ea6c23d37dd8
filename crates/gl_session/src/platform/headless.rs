//! In-memory display backend
//!
//! [`HeadlessBackend`] implements [`DisplayBackend`] without a display. It
//! accounts for every handle it hands out, checks the ordering rules a real
//! driver would silently punish (surface released before its context, window
//! destroyed while the display mode is still overridden, a pixel format applied
//! twice) and lets any call be made to fail on demand.
//!
//! Events are scripted: each [`HeadlessBackend::poll_event`] call pops one
//! entry, where an idle entry stands for "no message pending". Once the script
//! runs out the backend reports a close request, so a run loop driven by it
//! always terminates.

use std::collections::{HashSet, VecDeque};

use crate::foundation::math::Vec3;
use crate::input::WindowEvent;
use crate::render::{ColoredVertex, Primitive, Projection, RenderState, Renderer, Rgba};
use crate::session::{
    BackendError, DisplayBackend, FrameInsets, PixelFormatRequest, VideoMode, WindowDesc, WindowRect, WindowStyle,
};

/// Backend operations that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fault {
    /// `register_class` fails
    RegisterClass,
    /// `unregister_class` fails
    UnregisterClass,
    /// `change_display_mode` rejects every mode
    ChangeDisplayMode,
    /// `restore_display_mode` fails
    RestoreDisplayMode,
    /// `create_window` fails
    CreateWindow,
    /// `destroy_window` fails
    DestroyWindow,
    /// `acquire_surface` fails
    AcquireSurface,
    /// `release_surface` fails
    ReleaseSurface,
    /// `choose_pixel_format` finds nothing
    ChoosePixelFormat,
    /// `apply_pixel_format` fails
    ApplyPixelFormat,
    /// `create_context` fails
    CreateContext,
    /// `make_current` fails
    MakeCurrent,
    /// `clear_current` fails
    ClearCurrent,
    /// `delete_context` fails
    DeleteContext,
    /// `swap_buffers` fails
    SwapBuffers,
}

/// Journal entry for one backend call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    /// Window class registration
    RegisterClass,
    /// Window class removal
    UnregisterClass,
    /// Display mode change
    ChangeDisplayMode(VideoMode),
    /// Desktop mode restore
    RestoreDisplayMode,
    /// Cursor visibility change
    SetCursorVisible(bool),
    /// Window creation
    CreateWindow(WindowStyle),
    /// Window destruction
    DestroyWindow(WindowId),
    /// Surface acquisition
    AcquireSurface(WindowId),
    /// Surface release
    ReleaseSurface(SurfaceId),
    /// Pixel format negotiation
    ChoosePixelFormat,
    /// Pixel format application
    ApplyPixelFormat(SurfaceId),
    /// Context creation
    CreateContext(SurfaceId),
    /// Context binding
    MakeCurrent(ContextId),
    /// Context unbinding
    ClearCurrent,
    /// Context deletion
    DeleteContext(ContextId),
    /// Window shown and focused
    PresentWindow(WindowId),
    /// Buffer swap
    SwapBuffers(SurfaceId),
}

/// Fixed-function call captured by the headless renderer
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    /// Viewport and projection load
    Projection(Projection),
    /// Baseline render state
    RenderState(RenderState),
    /// Clear color change
    ClearColor(Rgba),
    /// Buffer clear
    Clear,
    /// Model-view reset
    LoadIdentity,
    /// Translation
    Translate(Vec3),
    /// Rotation in degrees about an axis
    Rotate(f32, Vec3),
    /// Immediate-mode batch
    Draw(Primitive, Vec<ColoredVertex>),
}

/// Headless window handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(u32);

/// Headless surface handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(u32);

/// Headless context handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(u32);

/// Headless pixel format index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatId(u32);

#[derive(Debug, Clone)]
struct WindowRecord {
    id: WindowId,
    style: WindowStyle,
    rect: WindowRect,
    title: String,
}

#[derive(Debug, Clone, Copy)]
struct SurfaceRecord {
    id: SurfaceId,
    window: WindowId,
    format_applied: bool,
}

#[derive(Debug, Clone, Copy)]
struct ContextRecord {
    id: ContextId,
    surface: SurfaceId,
}

/// Resource-accounting fake display
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    next_handle: u32,
    faults: HashSet<Fault>,
    classes: Vec<String>,
    display_override: Option<VideoMode>,
    cursor_hidden: bool,
    windows: Vec<WindowRecord>,
    surfaces: Vec<SurfaceRecord>,
    contexts: Vec<ContextRecord>,
    current: Option<ContextId>,
    frame_insets: FrameInsets,
    script: VecDeque<Option<WindowEvent>>,
    journal: Vec<Call>,
    draws: Vec<DrawCall>,
    draws_without_context: usize,
    violations: Vec<String>,
}

impl HeadlessBackend {
    /// Backend with no faults and an empty event script
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `fault` fire on every matching call
    #[must_use]
    pub fn with_fault(mut self, fault: Fault) -> Self {
        self.faults.insert(fault);
        self
    }

    /// Frame insets reported for decorated windows
    #[must_use]
    pub fn with_frame_insets(mut self, insets: FrameInsets) -> Self {
        self.frame_insets = insets;
        self
    }

    /// Arm a fault
    pub fn inject(&mut self, fault: Fault) {
        self.faults.insert(fault);
    }

    /// Disarm a fault
    pub fn heal(&mut self, fault: Fault) {
        self.faults.remove(&fault);
    }

    /// Queue an event
    pub fn push_event(&mut self, event: WindowEvent) {
        self.script.push_back(Some(event));
    }

    /// Queue `count` polls that find no message
    pub fn push_idle(&mut self, count: usize) {
        self.script.extend(std::iter::repeat(None).take(count));
    }

    /// Every call made so far
    pub fn journal(&self) -> &[Call] {
        &self.journal
    }

    /// Forget the journal and captured draws
    pub fn clear_journal(&mut self) {
        self.journal.clear();
        self.draws.clear();
    }

    /// Fixed-function calls captured while a context was current
    pub fn draws(&self) -> &[DrawCall] {
        &self.draws
    }

    /// Renderer calls issued with no current context
    pub const fn draws_without_context(&self) -> usize {
        self.draws_without_context
    }

    /// Ordering rules broken so far
    pub fn violations(&self) -> &[String] {
        &self.violations
    }

    /// Number of `SwapBuffers` calls
    pub fn swap_count(&self) -> usize {
        self.journal
            .iter()
            .filter(|call| matches!(call, Call::SwapBuffers(_)))
            .count()
    }

    /// Count of outstanding resources and overrides
    ///
    /// Zero means the backend is back to its pristine state.
    pub fn outstanding(&self) -> usize {
        self.classes.len()
            + self.windows.len()
            + self.surfaces.len()
            + self.contexts.len()
            + usize::from(self.display_override.is_some())
            + usize::from(self.cursor_hidden)
            + usize::from(self.current.is_some())
    }

    /// Live window count
    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    /// Live surface count
    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    /// Live context count
    pub fn context_count(&self) -> usize {
        self.contexts.len()
    }

    /// Whether a window class is registered
    pub fn is_class_registered(&self, class_name: &str) -> bool {
        self.classes.iter().any(|c| c == class_name)
    }

    /// Display mode currently overriding the desktop
    pub const fn display_override(&self) -> Option<VideoMode> {
        self.display_override
    }

    /// Whether the cursor is visible
    pub const fn cursor_visible(&self) -> bool {
        !self.cursor_hidden
    }

    /// Context bound to the calling thread
    pub const fn current_context(&self) -> Option<ContextId> {
        self.current
    }

    /// Outer rectangle of a live window
    pub fn window_rect(&self, window: WindowId) -> Option<WindowRect> {
        self.find_window(window).map(|w| w.rect)
    }

    /// Style of a live window
    pub fn window_style(&self, window: WindowId) -> Option<WindowStyle> {
        self.find_window(window).map(|w| w.style)
    }

    /// Title of a live window
    pub fn window_title(&self, window: WindowId) -> Option<&str> {
        self.find_window(window).map(|w| w.title.as_str())
    }

    fn find_window(&self, window: WindowId) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| w.id == window)
    }

    fn next_handle(&mut self) -> u32 {
        self.next_handle += 1;
        self.next_handle
    }

    fn check(&self, fault: Fault) -> Result<(), BackendError> {
        if self.faults.contains(&fault) {
            Err(BackendError::Rejected(format!("injected fault: {fault:?}")))
        } else {
            Ok(())
        }
    }

    fn violation(&mut self, message: String) {
        log::error!("Headless backend: {}", message);
        self.violations.push(message);
    }

    fn record_draw(&mut self, call: DrawCall) {
        if self.current.is_some() {
            self.draws.push(call);
        } else {
            self.draws_without_context += 1;
        }
    }
}

impl DisplayBackend for HeadlessBackend {
    type Window = WindowId;
    type Surface = SurfaceId;
    type Context = ContextId;
    type PixelFormat = FormatId;

    fn register_class(&mut self, class_name: &str) -> Result<(), BackendError> {
        self.journal.push(Call::RegisterClass);
        self.check(Fault::RegisterClass)?;
        if self.is_class_registered(class_name) {
            return Err(BackendError::AlreadyRegistered);
        }
        self.classes.push(class_name.to_string());
        Ok(())
    }

    fn unregister_class(&mut self, class_name: &str) -> Result<(), BackendError> {
        self.journal.push(Call::UnregisterClass);
        self.check(Fault::UnregisterClass)?;
        if !self.windows.is_empty() {
            return Err(BackendError::Rejected(format!("class {class_name} still has windows")));
        }
        match self.classes.iter().position(|c| c == class_name) {
            Some(index) => {
                self.classes.remove(index);
                Ok(())
            }
            None => Err(BackendError::Rejected(format!("class {class_name} is not registered"))),
        }
    }

    fn change_display_mode(&mut self, mode: VideoMode) -> Result<(), BackendError> {
        self.journal.push(Call::ChangeDisplayMode(mode));
        if self.faults.contains(&Fault::ChangeDisplayMode) {
            return Err(BackendError::UnsupportedMode(mode));
        }
        self.display_override = Some(mode);
        Ok(())
    }

    fn restore_display_mode(&mut self) -> Result<(), BackendError> {
        self.journal.push(Call::RestoreDisplayMode);
        self.check(Fault::RestoreDisplayMode)?;
        self.display_override = None;
        Ok(())
    }

    fn set_cursor_visible(&mut self, visible: bool) {
        self.journal.push(Call::SetCursorVisible(visible));
        self.cursor_hidden = !visible;
    }

    fn frame_insets(&self, style: WindowStyle) -> FrameInsets {
        match style {
            WindowStyle::Popup => FrameInsets::default(),
            WindowStyle::Overlapped => self.frame_insets,
        }
    }

    fn create_window(&mut self, desc: &WindowDesc<'_>) -> Result<WindowId, BackendError> {
        self.journal.push(Call::CreateWindow(desc.style));
        self.check(Fault::CreateWindow)?;
        if !self.is_class_registered(desc.class_name) {
            return Err(BackendError::Rejected(format!("class {} is not registered", desc.class_name)));
        }
        let id = WindowId(self.next_handle());
        self.windows.push(WindowRecord {
            id,
            style: desc.style,
            rect: desc.rect,
            title: desc.title.to_string(),
        });
        Ok(id)
    }

    fn destroy_window(&mut self, window: WindowId) -> Result<(), BackendError> {
        self.journal.push(Call::DestroyWindow(window));
        self.check(Fault::DestroyWindow)?;
        if self.surfaces.iter().any(|s| s.window == window) {
            self.violation(format!("{window:?} destroyed while its surface is held"));
        }
        if self.display_override.is_some() {
            self.violation(format!("{window:?} destroyed before the display mode was restored"));
        }
        let index = self
            .windows
            .iter()
            .position(|w| w.id == window)
            .ok_or_else(|| BackendError::Rejected(format!("{window:?} does not exist")))?;
        self.windows.remove(index);
        Ok(())
    }

    fn acquire_surface(&mut self, window: WindowId) -> Result<SurfaceId, BackendError> {
        self.journal.push(Call::AcquireSurface(window));
        self.check(Fault::AcquireSurface)?;
        if self.find_window(window).is_none() {
            return Err(BackendError::Rejected(format!("{window:?} does not exist")));
        }
        let id = SurfaceId(self.next_handle());
        self.surfaces.push(SurfaceRecord {
            id,
            window,
            format_applied: false,
        });
        Ok(id)
    }

    fn release_surface(&mut self, window: WindowId, surface: SurfaceId) -> Result<(), BackendError> {
        self.journal.push(Call::ReleaseSurface(surface));
        self.check(Fault::ReleaseSurface)?;
        if self.contexts.iter().any(|c| c.surface == surface) {
            self.violation(format!("{surface:?} released while a context still uses it"));
        }
        let index = self
            .surfaces
            .iter()
            .position(|s| s.id == surface && s.window == window)
            .ok_or_else(|| BackendError::Rejected(format!("{surface:?} does not belong to {window:?}")))?;
        self.surfaces.remove(index);
        Ok(())
    }

    fn choose_pixel_format(
        &mut self,
        surface: SurfaceId,
        request: &PixelFormatRequest,
    ) -> Result<FormatId, BackendError> {
        self.journal.push(Call::ChoosePixelFormat);
        self.check(Fault::ChoosePixelFormat)?;
        if !self.surfaces.iter().any(|s| s.id == surface) {
            return Err(BackendError::Rejected(format!("{surface:?} does not exist")));
        }
        Ok(FormatId(u32::from(request.color_bits)))
    }

    fn apply_pixel_format(
        &mut self,
        surface: SurfaceId,
        _format: FormatId,
        _request: &PixelFormatRequest,
    ) -> Result<(), BackendError> {
        self.journal.push(Call::ApplyPixelFormat(surface));
        self.check(Fault::ApplyPixelFormat)?;
        let record = self
            .surfaces
            .iter_mut()
            .find(|s| s.id == surface)
            .ok_or_else(|| BackendError::Rejected(format!("{surface:?} does not exist")))?;
        if record.format_applied {
            return Err(BackendError::Rejected(format!("{surface:?} already has a pixel format")));
        }
        record.format_applied = true;
        Ok(())
    }

    fn create_context(&mut self, surface: SurfaceId) -> Result<ContextId, BackendError> {
        self.journal.push(Call::CreateContext(surface));
        self.check(Fault::CreateContext)?;
        match self.surfaces.iter().find(|s| s.id == surface) {
            Some(record) if record.format_applied => {}
            Some(_) => return Err(BackendError::Rejected(format!("{surface:?} has no pixel format"))),
            None => return Err(BackendError::Rejected(format!("{surface:?} does not exist"))),
        }
        let id = ContextId(self.next_handle());
        self.contexts.push(ContextRecord { id, surface });
        Ok(id)
    }

    fn make_current(&mut self, surface: SurfaceId, context: ContextId) -> Result<(), BackendError> {
        self.journal.push(Call::MakeCurrent(context));
        self.check(Fault::MakeCurrent)?;
        if !self.contexts.iter().any(|c| c.id == context && c.surface == surface) {
            return Err(BackendError::Rejected(format!("{context:?} is not a context of {surface:?}")));
        }
        if let Some(previous) = self.current.filter(|&c| c != context) {
            self.violation(format!("{context:?} bound while {previous:?} is still current"));
        }
        self.current = Some(context);
        Ok(())
    }

    fn clear_current(&mut self) -> Result<(), BackendError> {
        self.journal.push(Call::ClearCurrent);
        self.check(Fault::ClearCurrent)?;
        self.current = None;
        Ok(())
    }

    fn delete_context(&mut self, context: ContextId) -> Result<(), BackendError> {
        self.journal.push(Call::DeleteContext(context));
        self.check(Fault::DeleteContext)?;
        let index = self
            .contexts
            .iter()
            .position(|c| c.id == context)
            .ok_or_else(|| BackendError::Rejected(format!("{context:?} does not exist")))?;
        self.contexts.remove(index);
        // A deleted context stops being current, as with wglDeleteContext
        if self.current == Some(context) {
            self.current = None;
        }
        Ok(())
    }

    fn present_window(&mut self, window: WindowId) {
        self.journal.push(Call::PresentWindow(window));
    }

    fn swap_buffers(&mut self, surface: SurfaceId) -> Result<(), BackendError> {
        self.journal.push(Call::SwapBuffers(surface));
        self.check(Fault::SwapBuffers)
    }

    fn poll_event(&mut self) -> Option<WindowEvent> {
        match self.script.pop_front() {
            Some(entry) => entry,
            None => Some(WindowEvent::CloseRequested),
        }
    }
}

impl Renderer for HeadlessBackend {
    fn apply_projection(&mut self, projection: &Projection) {
        self.record_draw(DrawCall::Projection(projection.clone()));
    }

    fn apply_render_state(&mut self, state: &RenderState) {
        self.record_draw(DrawCall::RenderState(*state));
    }

    fn set_clear_color(&mut self, color: Rgba) {
        self.record_draw(DrawCall::ClearColor(color));
    }

    fn clear(&mut self) {
        self.record_draw(DrawCall::Clear);
    }

    fn load_identity(&mut self) {
        self.record_draw(DrawCall::LoadIdentity);
    }

    fn translate(&mut self, offset: Vec3) {
        self.record_draw(DrawCall::Translate(offset));
    }

    fn rotate(&mut self, degrees: f32, axis: Vec3) {
        self.record_draw(DrawCall::Rotate(degrees, axis));
    }

    fn draw(&mut self, primitive: Primitive, vertices: &[ColoredVertex]) {
        self.record_draw(DrawCall::Draw(primitive, vertices.to_vec()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desc(style: WindowStyle) -> WindowDesc<'static> {
        WindowDesc {
            class_name: "Test",
            title: "Test",
            style,
            rect: WindowRect::from_client_size(64, 48),
        }
    }

    #[test]
    fn test_pixel_format_applies_once() {
        let mut backend = HeadlessBackend::new();
        backend.register_class("Test").unwrap();
        let window = backend.create_window(&desc(WindowStyle::Overlapped)).unwrap();
        let surface = backend.acquire_surface(window).unwrap();
        let request = PixelFormatRequest::for_color_depth(32);
        let format = backend.choose_pixel_format(surface, &request).unwrap();

        assert!(backend.apply_pixel_format(surface, format, &request).is_ok());
        assert!(backend.apply_pixel_format(surface, format, &request).is_err());
    }

    #[test]
    fn test_context_requires_pixel_format() {
        let mut backend = HeadlessBackend::new();
        backend.register_class("Test").unwrap();
        let window = backend.create_window(&desc(WindowStyle::Overlapped)).unwrap();
        let surface = backend.acquire_surface(window).unwrap();

        assert!(backend.create_context(surface).is_err());
        assert_eq!(backend.context_count(), 0);
    }

    #[test]
    fn test_out_of_order_release_is_a_violation() {
        let mut backend = HeadlessBackend::new();
        backend.register_class("Test").unwrap();
        let window = backend.create_window(&desc(WindowStyle::Overlapped)).unwrap();
        let _surface = backend.acquire_surface(window).unwrap();

        backend.destroy_window(window).unwrap();
        assert_eq!(backend.violations().len(), 1);
    }

    #[test]
    fn test_second_registration_reports_existing_class() {
        let mut backend = HeadlessBackend::new();

        assert!(backend.register_class("Test").is_ok());
        assert_eq!(backend.register_class("Test"), Err(BackendError::AlreadyRegistered));
    }

    #[test]
    fn test_draws_need_current_context() {
        let mut backend = HeadlessBackend::new();
        backend.clear();

        assert!(backend.draws().is_empty());
        assert_eq!(backend.draws_without_context(), 1);
    }

    #[test]
    fn test_exhausted_script_requests_close() {
        let mut backend = HeadlessBackend::new();
        backend.push_idle(1);
        backend.push_event(WindowEvent::Activated { minimized: false });

        assert_eq!(backend.poll_event(), None);
        assert_eq!(backend.poll_event(), Some(WindowEvent::Activated { minimized: false }));
        assert_eq!(backend.poll_event(), Some(WindowEvent::CloseRequested));
    }

    #[test]
    fn test_faults_can_be_healed() {
        let mut backend = HeadlessBackend::new().with_fault(Fault::RegisterClass);
        assert!(backend.register_class("Test").is_err());

        backend.heal(Fault::RegisterClass);
        assert!(backend.register_class("Test").is_ok());
        assert_eq!(backend.outstanding(), 1);
    }
}
