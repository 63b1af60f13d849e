//! uid/gid to name resolution through the system user and group databases.

use std::collections::HashMap;
use std::ffi::CStr;

const MAX_LOOKUP_BUFFER: usize = 1 << 20;

fn initial_buffer_len(key: libc::c_int) -> usize {
    // SAFETY: sysconf has no memory-safety preconditions.
    let hint = unsafe { libc::sysconf(key) };
    if hint > 0 {
        hint as usize
    } else {
        1024
    }
}

pub fn user_name(uid: u32) -> Option<String> {
    let mut buf = vec![0 as libc::c_char; initial_buffer_len(libc::_SC_GETPW_R_SIZE_MAX)];
    loop {
        // SAFETY: passwd is plain old data; getpwuid_r fills it and points its
        // strings into `buf`, which outlives every read below.
        let mut pwd: libc::passwd = unsafe { std::mem::zeroed() };
        let mut result: *mut libc::passwd = std::ptr::null_mut();
        let rc = unsafe {
            libc::getpwuid_r(uid, &mut pwd, buf.as_mut_ptr(), buf.len(), &mut result)
        };
        if rc == libc::ERANGE && buf.len() < MAX_LOOKUP_BUFFER {
            buf.resize(buf.len() * 2, 0);
            continue;
        }
        if rc != 0 || result.is_null() || pwd.pw_name.is_null() {
            return None;
        }
        let name = unsafe { CStr::from_ptr(pwd.pw_name) };
        return Some(name.to_string_lossy().into_owned());
    }
}

pub fn group_name(gid: u32) -> Option<String> {
    let mut buf = vec![0 as libc::c_char; initial_buffer_len(libc::_SC_GETGR_R_SIZE_MAX)];
    loop {
        // SAFETY: same contract as in `user_name`, for the group database.
        let mut grp: libc::group = unsafe { std::mem::zeroed() };
        let mut result: *mut libc::group = std::ptr::null_mut();
        let rc = unsafe {
            libc::getgrgid_r(gid, &mut grp, buf.as_mut_ptr(), buf.len(), &mut result)
        };
        if rc == libc::ERANGE && buf.len() < MAX_LOOKUP_BUFFER {
            buf.resize(buf.len() * 2, 0);
            continue;
        }
        if rc != 0 || result.is_null() || grp.gr_name.is_null() {
            return None;
        }
        let name = unsafe { CStr::from_ptr(grp.gr_name) };
        return Some(name.to_string_lossy().into_owned());
    }
}

/// Memoizes lookups for one listing. Unknown ids render as their decimal value.
#[derive(Debug, Default)]
pub struct NameResolver {
    users: HashMap<u32, String>,
    groups: HashMap<u32, String>,
}

impl NameResolver {
    pub fn owner(&mut self, uid: u32) -> String {
        self.users
            .entry(uid)
            .or_insert_with(|| {
                user_name(uid).unwrap_or_else(|| {
                    tracing::debug!(uid, "no passwd entry, using numeric id");
                    uid.to_string()
                })
            })
            .clone()
    }

    pub fn group(&mut self, gid: u32) -> String {
        self.groups
            .entry(gid)
            .or_insert_with(|| {
                group_name(gid).unwrap_or_else(|| {
                    tracing::debug!(gid, "no group entry, using numeric id");
                    gid.to_string()
                })
            })
            .clone()
    }
}
