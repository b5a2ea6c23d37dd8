//! Native window, device context and WGL context management

use std::mem;
use std::ptr;

use windows_sys::Win32::Foundation::{GetLastError, ERROR_CLASS_ALREADY_EXISTS, HINSTANCE, HWND, RECT};
use windows_sys::Win32::Graphics::Gdi::{
    ChangeDisplaySettingsW, GetDC, ReleaseDC, UpdateWindow, CDS_FULLSCREEN, DEVMODEW, DISP_CHANGE_SUCCESSFUL,
    DM_BITSPERPEL, DM_PELSHEIGHT, DM_PELSWIDTH, HDC,
};
use windows_sys::Win32::Graphics::OpenGL::{
    wglCreateContext, wglDeleteContext, wglMakeCurrent, ChoosePixelFormat, SetPixelFormat, SwapBuffers, HGLRC,
    PFD_DOUBLEBUFFER, PFD_DRAW_TO_WINDOW, PFD_MAIN_PLANE, PFD_SUPPORT_OPENGL, PFD_TYPE_RGBA, PIXELFORMATDESCRIPTOR,
};
use windows_sys::Win32::System::LibraryLoader::GetModuleHandleW;
use windows_sys::Win32::UI::Input::KeyboardAndMouse::SetFocus;
use windows_sys::Win32::UI::WindowsAndMessaging::{
    AdjustWindowRectEx, CreateWindowExW, DestroyWindow, DispatchMessageW, LoadCursorW, LoadIconW, PeekMessageW,
    RegisterClassExW, SetForegroundWindow, ShowCursor, ShowWindow, TranslateMessage, UnregisterClassW, WaitMessage,
    CS_HREDRAW, CS_OWNDC, CS_VREDRAW, IDC_ARROW, IDI_WINLOGO, MSG, PM_REMOVE, SW_SHOW, WINDOW_EX_STYLE, WINDOW_STYLE,
    WM_QUIT, WNDCLASSEXW, WS_CLIPCHILDREN, WS_CLIPSIBLINGS, WS_EX_APPWINDOW, WS_EX_WINDOWEDGE, WS_OVERLAPPEDWINDOW,
    WS_POPUP,
};

use super::{wide, wndproc};
use crate::input::WindowEvent;
use crate::session::{
    BackendError, DisplayBackend, FrameInsets, PixelFormatFlags, PixelFormatRequest, VideoMode, WindowDesc,
    WindowStyle,
};

fn last_error(operation: &'static str) -> BackendError {
    let code = unsafe { GetLastError() };
    BackendError::Os { operation, code }
}

const fn window_styles(style: WindowStyle) -> (WINDOW_EX_STYLE, WINDOW_STYLE) {
    match style {
        WindowStyle::Popup => (WS_EX_APPWINDOW, WS_POPUP),
        WindowStyle::Overlapped => (WS_EX_APPWINDOW | WS_EX_WINDOWEDGE, WS_OVERLAPPEDWINDOW),
    }
}

fn pixel_format_descriptor(request: &PixelFormatRequest) -> PIXELFORMATDESCRIPTOR {
    // All-zero is the "don't care" value for every descriptor field
    let mut pfd: PIXELFORMATDESCRIPTOR = unsafe { mem::zeroed() };
    pfd.nSize = mem::size_of::<PIXELFORMATDESCRIPTOR>() as u16;
    pfd.nVersion = 1;

    let mut flags = 0;
    if request.flags.contains(PixelFormatFlags::DRAW_TO_WINDOW) {
        flags |= PFD_DRAW_TO_WINDOW;
    }
    if request.flags.contains(PixelFormatFlags::SUPPORT_OPENGL) {
        flags |= PFD_SUPPORT_OPENGL;
    }
    if request.flags.contains(PixelFormatFlags::DOUBLE_BUFFER) {
        flags |= PFD_DOUBLEBUFFER;
    }
    pfd.dwFlags = flags;
    pfd.iPixelType = PFD_TYPE_RGBA as _;
    pfd.cColorBits = request.color_bits;
    pfd.cDepthBits = request.depth_bits;
    pfd.cStencilBits = request.stencil_bits;
    pfd.cAuxBuffers = request.aux_buffers;
    pfd.iLayerType = PFD_MAIN_PLANE as _;
    pfd
}

/// Display backend over Win32 windows and WGL
///
/// # Thread Safety
/// Must be used from the thread that created it; window messages and the
/// current GL context are thread-affine.
#[derive(Debug)]
pub struct Win32Backend {
    instance: HINSTANCE,
}

impl Win32Backend {
    /// Backend bound to the current module instance
    pub fn new() -> Self {
        let instance = unsafe { GetModuleHandleW(ptr::null()) };
        log::debug!("Win32 backend on module instance {:#x}", instance);
        Self { instance }
    }
}

impl Default for Win32Backend {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayBackend for Win32Backend {
    type Window = HWND;
    type Surface = HDC;
    type Context = HGLRC;
    type PixelFormat = i32;

    fn register_class(&mut self, class_name: &str) -> Result<(), BackendError> {
        let class_name = wide(class_name);
        let class = WNDCLASSEXW {
            cbSize: mem::size_of::<WNDCLASSEXW>() as u32,
            style: CS_HREDRAW | CS_VREDRAW | CS_OWNDC,
            lpfnWndProc: Some(wndproc::window_proc),
            cbClsExtra: 0,
            cbWndExtra: 0,
            hInstance: self.instance,
            hIcon: unsafe { LoadIconW(0, IDI_WINLOGO) },
            hCursor: unsafe { LoadCursorW(0, IDC_ARROW) },
            hbrBackground: 0,
            lpszMenuName: ptr::null(),
            lpszClassName: class_name.as_ptr(),
            hIconSm: 0,
        };

        if unsafe { RegisterClassExW(&class) } == 0 {
            let code = unsafe { GetLastError() };
            if code == ERROR_CLASS_ALREADY_EXISTS {
                return Err(BackendError::AlreadyRegistered);
            }
            return Err(BackendError::Os {
                operation: "RegisterClassExW",
                code,
            });
        }
        Ok(())
    }

    fn unregister_class(&mut self, class_name: &str) -> Result<(), BackendError> {
        let class_name = wide(class_name);
        if unsafe { UnregisterClassW(class_name.as_ptr(), self.instance) } == 0 {
            return Err(last_error("UnregisterClassW"));
        }
        Ok(())
    }

    fn change_display_mode(&mut self, mode: VideoMode) -> Result<(), BackendError> {
        let mut settings: DEVMODEW = unsafe { mem::zeroed() };
        settings.dmSize = mem::size_of::<DEVMODEW>() as u16;
        settings.dmPelsWidth = mode.width;
        settings.dmPelsHeight = mode.height;
        settings.dmBitsPerPel = u32::from(mode.bits_per_pixel);
        settings.dmFields = DM_BITSPERPEL | DM_PELSWIDTH | DM_PELSHEIGHT;

        let result = unsafe { ChangeDisplaySettingsW(&settings, CDS_FULLSCREEN) };
        if result != DISP_CHANGE_SUCCESSFUL {
            log::debug!("ChangeDisplaySettingsW({}) returned {}", mode, result);
            return Err(BackendError::UnsupportedMode(mode));
        }
        Ok(())
    }

    fn restore_display_mode(&mut self) -> Result<(), BackendError> {
        let result = unsafe { ChangeDisplaySettingsW(ptr::null(), 0) };
        if result != DISP_CHANGE_SUCCESSFUL {
            return Err(BackendError::Os {
                operation: "ChangeDisplaySettingsW",
                code: result as u32,
            });
        }
        Ok(())
    }

    fn set_cursor_visible(&mut self, visible: bool) {
        unsafe {
            ShowCursor(i32::from(visible));
        }
    }

    fn frame_insets(&self, style: WindowStyle) -> FrameInsets {
        let (ex_style, style) = window_styles(style);
        let mut rect = RECT {
            left: 0,
            top: 0,
            right: 0,
            bottom: 0,
        };
        if unsafe { AdjustWindowRectEx(&mut rect, style, 0, ex_style) } == 0 {
            log::warn!("AdjustWindowRectEx failed; assuming a borderless frame");
            return FrameInsets::default();
        }
        FrameInsets {
            left: -rect.left,
            top: -rect.top,
            right: rect.right,
            bottom: rect.bottom,
        }
    }

    fn create_window(&mut self, desc: &WindowDesc<'_>) -> Result<HWND, BackendError> {
        let (ex_style, style) = window_styles(desc.style);
        let class_name = wide(desc.class_name);
        let title = wide(desc.title);

        let hwnd = unsafe {
            CreateWindowExW(
                ex_style,
                class_name.as_ptr(),
                title.as_ptr(),
                WS_CLIPSIBLINGS | WS_CLIPCHILDREN | style,
                0,
                0,
                desc.rect.width(),
                desc.rect.height(),
                0,
                0,
                self.instance,
                ptr::null(),
            )
        };
        if hwnd == 0 {
            return Err(last_error("CreateWindowExW"));
        }
        Ok(hwnd)
    }

    fn destroy_window(&mut self, window: HWND) -> Result<(), BackendError> {
        let destroyed = unsafe { DestroyWindow(window) } != 0;
        wndproc::discard_pending();
        if !destroyed {
            return Err(last_error("DestroyWindow"));
        }
        Ok(())
    }

    fn acquire_surface(&mut self, window: HWND) -> Result<HDC, BackendError> {
        let hdc = unsafe { GetDC(window) };
        if hdc == 0 {
            return Err(BackendError::Os {
                operation: "GetDC",
                code: 0,
            });
        }
        Ok(hdc)
    }

    fn release_surface(&mut self, window: HWND, surface: HDC) -> Result<(), BackendError> {
        if unsafe { ReleaseDC(window, surface) } == 0 {
            return Err(BackendError::Os {
                operation: "ReleaseDC",
                code: 0,
            });
        }
        Ok(())
    }

    fn choose_pixel_format(&mut self, surface: HDC, request: &PixelFormatRequest) -> Result<i32, BackendError> {
        let pfd = pixel_format_descriptor(request);
        let format = unsafe { ChoosePixelFormat(surface, &pfd) };
        if format == 0 {
            return Err(last_error("ChoosePixelFormat"));
        }
        log::debug!("Pixel format {} chosen for {:?}", format, request);
        Ok(format)
    }

    fn apply_pixel_format(
        &mut self,
        surface: HDC,
        format: i32,
        request: &PixelFormatRequest,
    ) -> Result<(), BackendError> {
        let pfd = pixel_format_descriptor(request);
        if unsafe { SetPixelFormat(surface, format, &pfd) } == 0 {
            return Err(last_error("SetPixelFormat"));
        }
        Ok(())
    }

    fn create_context(&mut self, surface: HDC) -> Result<HGLRC, BackendError> {
        let context = unsafe { wglCreateContext(surface) };
        if context == 0 {
            return Err(last_error("wglCreateContext"));
        }
        Ok(context)
    }

    fn make_current(&mut self, surface: HDC, context: HGLRC) -> Result<(), BackendError> {
        if unsafe { wglMakeCurrent(surface, context) } == 0 {
            return Err(last_error("wglMakeCurrent"));
        }
        Ok(())
    }

    fn clear_current(&mut self) -> Result<(), BackendError> {
        if unsafe { wglMakeCurrent(0, 0) } == 0 {
            return Err(last_error("wglMakeCurrent"));
        }
        Ok(())
    }

    fn delete_context(&mut self, context: HGLRC) -> Result<(), BackendError> {
        if unsafe { wglDeleteContext(context) } == 0 {
            return Err(last_error("wglDeleteContext"));
        }
        Ok(())
    }

    fn present_window(&mut self, window: HWND) {
        unsafe {
            ShowWindow(window, SW_SHOW);
            UpdateWindow(window);
            SetForegroundWindow(window);
            SetFocus(window);
        }
    }

    fn swap_buffers(&mut self, surface: HDC) -> Result<(), BackendError> {
        if unsafe { SwapBuffers(surface) } == 0 {
            return Err(last_error("SwapBuffers"));
        }
        Ok(())
    }

    fn poll_event(&mut self) -> Option<WindowEvent> {
        if let Some(event) = wndproc::pop() {
            return Some(event);
        }

        let mut msg: MSG = unsafe { mem::zeroed() };
        while unsafe { PeekMessageW(&mut msg, 0, 0, 0, PM_REMOVE) } != 0 {
            if msg.message == WM_QUIT {
                return Some(WindowEvent::CloseRequested);
            }
            unsafe {
                TranslateMessage(&msg);
                DispatchMessageW(&msg);
            }
            if let Some(event) = wndproc::pop() {
                return Some(event);
            }
        }
        None
    }

    fn wait_event(&mut self) {
        unsafe {
            WaitMessage();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_carries_request() {
        let pfd = pixel_format_descriptor(&PixelFormatRequest::for_color_depth(32));

        assert_eq!(pfd.nVersion, 1);
        assert_eq!(pfd.dwFlags, PFD_DRAW_TO_WINDOW | PFD_SUPPORT_OPENGL | PFD_DOUBLEBUFFER);
        assert_eq!(pfd.cColorBits, 32);
        assert_eq!(pfd.cDepthBits, 32);
        assert_eq!(pfd.cStencilBits, 0);
    }

    #[test]
    fn test_popup_has_no_frame() {
        let backend = Win32Backend::new();
        assert_eq!(backend.frame_insets(WindowStyle::Popup), FrameInsets::default());
    }
}
