// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared memory regions backed by `shm_open` + `mmap`
//!
//! A region is a fixed-size, page-aligned mapping. It cannot grow once other
//! processes have mapped it, so its size is decided once at creation.

use crate::error::ChannelError;
use nix::errno::Errno;
use nix::fcntl::OFlag;
use nix::sys::mman::{mmap, mmap_anonymous, munmap, shm_open, shm_unlink, MapFlags, ProtFlags};
use nix::sys::stat::Mode;
use std::ffi::c_void;
use std::fs::File;
use std::num::NonZeroUsize;
use std::ptr::NonNull;

/// A mapped shared memory region; unmapped on drop, never unlinked implicitly
#[derive(Debug)]
pub struct SharedRegion {
    ptr: NonNull<c_void>,
    len: usize,
    name: Option<String>,
}

// SAFETY: the mapping is process-wide and stays valid until Drop; callers
// coordinate access to its contents through atomics and semaphores.
unsafe impl Send for SharedRegion {}
// SAFETY: see above; the region itself exposes only raw pointers.
unsafe impl Sync for SharedRegion {}

impl SharedRegion {
    /// Create and size a new named region, failing if the name is taken
    pub fn create(name: &str, len: usize) -> Result<Self, ChannelError> {
        let fd = shm_open(
            name,
            OFlag::O_CREAT | OFlag::O_EXCL | OFlag::O_RDWR,
            Mode::S_IRUSR | Mode::S_IWUSR,
        )
        .map_err(|e| ChannelError::from_open("shm_open(create)", name, e))?;
        let file = File::from(fd);

        let mapped = file
            .set_len(len as u64)
            .map_err(|e| io_error("ftruncate", name, &e))
            .and_then(|()| Self::map(&file, len, name));

        match mapped {
            Ok(region) => Ok(region),
            Err(e) => {
                // Nobody else can have attached yet; do not leak the name
                let _ = shm_unlink(name);
                Err(e)
            }
        }
    }

    /// Map an existing named region; never creates one
    pub fn open(name: &str) -> Result<Self, ChannelError> {
        let fd = shm_open(name, OFlag::O_RDWR, Mode::empty())
            .map_err(|e| ChannelError::from_open("shm_open", name, e))?;
        let file = File::from(fd);

        let len = file
            .metadata()
            .map_err(|e| io_error("fstat", name, &e))?
            .len() as usize;
        if len == 0 {
            return Err(ChannelError::NotReady {
                name: name.to_string(),
            });
        }

        Self::map(&file, len, name)
    }

    /// Anonymous shared mapping, visible to threads and forked children only
    pub fn anonymous(len: usize) -> Result<Self, ChannelError> {
        let length = non_zero(len, "anonymous")?;
        // SAFETY: a fresh anonymous mapping does not alias any Rust object.
        let ptr = unsafe {
            mmap_anonymous(
                None,
                length,
                ProtFlags::PROT_READ | ProtFlags::PROT_WRITE,
                MapFlags::MAP_SHARED,
            )
        }
        .map_err(|errno| ChannelError::Resource {
            op: "mmap",
            name: "anonymous".to_string(),
            errno,
        })?;

        Ok(Self {
            ptr,
            len,
            name: None,
        })
    }

    fn map(file: &File, len: usize, name: &str) -> Result<Self, ChannelError> {
        let length = non_zero(len, name)?;
        // SAFETY: mapping a shared memory object we hold an fd for; the new
        // mapping does not alias any Rust object. The fd may close afterwards.
        let ptr = unsafe {
            mmap(
                None,
                length,
                ProtFlags::PROT_READ | ProtFlags::PROT_WRITE,
                MapFlags::MAP_SHARED,
                file,
                0,
            )
        }
        .map_err(|errno| ChannelError::Resource {
            op: "mmap",
            name: name.to_string(),
            errno,
        })?;

        Ok(Self {
            ptr,
            len,
            name: Some(name.to_string()),
        })
    }

    /// Remove a region name. Returns false if it did not exist.
    pub fn unlink(name: &str) -> Result<bool, ChannelError> {
        match shm_unlink(name) {
            Ok(()) => Ok(true),
            Err(Errno::ENOENT) => Ok(false),
            Err(errno) => Err(ChannelError::Resource {
                op: "shm_unlink",
                name: name.to_string(),
                errno,
            }),
        }
    }

    pub fn as_ptr(&self) -> *mut u8 {
        self.ptr.as_ptr().cast()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl Drop for SharedRegion {
    fn drop(&mut self) {
        // SAFETY: ptr/len describe a mapping created by this value, unmapped once.
        if let Err(errno) = unsafe { munmap(self.ptr, self.len) } {
            tracing::warn!(region = ?self.name, error = %errno, "munmap failed");
        }
    }
}

fn non_zero(len: usize, name: &str) -> Result<NonZeroUsize, ChannelError> {
    NonZeroUsize::new(len).ok_or_else(|| ChannelError::Resource {
        op: "mmap",
        name: name.to_string(),
        errno: Errno::EINVAL,
    })
}

fn io_error(op: &'static str, name: &str, err: &std::io::Error) -> ChannelError {
    ChannelError::Resource {
        op,
        name: name.to_string(),
        errno: Errno::from_raw(err.raw_os_error().unwrap_or(libc::EIO)),
    }
}
