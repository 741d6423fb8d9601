//! Start a process with a module loaded before its entry point runs.
//!
//! The child is created suspended, the module path is written into its
//! address space, `LoadLibraryW` is queued as an APC on the main thread and
//! the thread is resumed. The APC runs during loader initialisation, ahead
//! of the game's own code.

use std::ffi::c_void;
use std::os::windows::ffi::OsStrExt;
use std::path::Path;

use tracing::{debug, info, warn};
use windows::core::{s, PCWSTR, PWSTR};
use windows::Win32::Foundation::{CloseHandle, HANDLE, WAIT_FAILED};
use windows::Win32::System::Diagnostics::Debug::WriteProcessMemory;
use windows::Win32::System::LibraryLoader::{GetModuleHandleA, GetProcAddress};
use windows::Win32::System::Memory::{VirtualAllocEx, MEM_COMMIT, MEM_RESERVE, PAGE_READWRITE};
use windows::Win32::System::Threading::{
    CreateProcessW, GetExitCodeProcess, QueueUserAPC, ResumeThread, TerminateProcess,
    WaitForSingleObject, CREATE_SUSPENDED, INFINITE, PROCESS_INFORMATION, STARTUPINFOW,
};

use super::process::{GameProcess, SpawnError};
use super::request::build_command_line;

/// Closes the wrapped handle on drop.
struct HandleGuard(HANDLE);

impl Drop for HandleGuard {
    fn drop(&mut self) {
        if !self.0.is_invalid() {
            unsafe {
                let _ = CloseHandle(self.0);
            }
        }
    }
}

/// Child created with an injected module. Owns the process and main thread
/// handles.
pub struct InjectedProcess {
    pid: u32,
    process: HandleGuard,
    _thread: HandleGuard,
}

impl GameProcess for InjectedProcess {
    fn id(&self) -> u32 {
        self.pid
    }

    fn wait(&mut self) -> std::io::Result<Option<i32>> {
        unsafe {
            if WaitForSingleObject(self.process.0, INFINITE) == WAIT_FAILED {
                return Err(std::io::Error::last_os_error());
            }

            let mut exit_code = 0u32;
            GetExitCodeProcess(self.process.0, &mut exit_code)
                .map_err(|_| std::io::Error::last_os_error())?;
            Ok(Some(exit_code as i32))
        }
    }
}

fn to_wide(path: &Path) -> Vec<u16> {
    path.as_os_str()
        .encode_wide()
        .chain(std::iter::once(0))
        .collect()
}

pub fn create_with_module(
    executable: &Path,
    args: &[String],
    working_dir: &Path,
    module: &Path,
) -> Result<InjectedProcess, SpawnError> {
    let application = to_wide(executable);
    let current_dir = to_wide(working_dir);
    let mut command_line: Vec<u16> = build_command_line(&executable.to_string_lossy(), args)
        .encode_utf16()
        .chain(std::iter::once(0))
        .collect();

    let startup_info = STARTUPINFOW {
        cb: std::mem::size_of::<STARTUPINFOW>() as u32,
        ..Default::default()
    };
    let mut process_info = PROCESS_INFORMATION::default();

    unsafe {
        CreateProcessW(
            PCWSTR(application.as_ptr()),
            PWSTR(command_line.as_mut_ptr()),
            None,
            None,
            false,
            CREATE_SUSPENDED,
            None,
            PCWSTR(current_dir.as_ptr()),
            &startup_info,
            &mut process_info,
        )
        .map_err(|_| SpawnError::Create(std::io::Error::last_os_error()))?;
    }

    let process = InjectedProcess {
        pid: process_info.dwProcessId,
        process: HandleGuard(process_info.hProcess),
        _thread: HandleGuard(process_info.hThread),
    };
    info!(
        "Created suspended process PID {} TID {}",
        process_info.dwProcessId, process_info.dwThreadId
    );

    if let Err(e) = queue_module_load(process_info.hProcess, process_info.hThread, module) {
        warn!("Injection failed, terminating PID {}: {}", process.pid, e);
        unsafe {
            let _ = TerminateProcess(process_info.hProcess, 1);
        }
        return Err(SpawnError::Inject(e));
    }

    let previous = unsafe { ResumeThread(process_info.hThread) };
    if previous == u32::MAX {
        let e = std::io::Error::last_os_error();
        unsafe {
            let _ = TerminateProcess(process_info.hProcess, 1);
        }
        return Err(SpawnError::Inject(e));
    }
    debug!("Main thread resumed (previous suspend count {})", previous);

    Ok(process)
}

fn queue_module_load(process: HANDLE, thread: HANDLE, module: &Path) -> std::io::Result<()> {
    let wide = to_wide(module);
    let size = wide.len() * std::mem::size_of::<u16>();

    unsafe {
        // Read by the loader after resume; released with the process.
        let remote = VirtualAllocEx(process, None, size, MEM_COMMIT | MEM_RESERVE, PAGE_READWRITE);
        if remote.is_null() {
            return Err(std::io::Error::last_os_error());
        }

        let mut written = 0usize;
        WriteProcessMemory(
            process,
            remote,
            wide.as_ptr() as *const c_void,
            size,
            Some(&mut written),
        )
        .map_err(|_| std::io::Error::last_os_error())?;
        if written != size {
            return Err(std::io::Error::other(format!(
                "partial write of module path: {written} of {size} bytes"
            )));
        }

        let kernel32 =
            GetModuleHandleA(s!("kernel32.dll")).map_err(|_| std::io::Error::last_os_error())?;
        let load_library = GetProcAddress(kernel32, s!("LoadLibraryW")).ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "LoadLibraryW not found")
        })?;

        let apc = std::mem::transmute::<
            unsafe extern "system" fn() -> isize,
            unsafe extern "system" fn(usize),
        >(load_library);
        if QueueUserAPC(Some(apc), thread, remote as usize) == 0 {
            return Err(std::io::Error::last_os_error());
        }
    }

    debug!("Queued LoadLibraryW({:?})", module);
    Ok(())
}
