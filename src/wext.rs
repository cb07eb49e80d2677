// ============================================================================
// src/wext.rs – Wireless-extensions private ioctl transport
// ============================================================================
//! Driver private commands (`WL_AP_CFG`, `AP_BSS_START`, `WL_AP_STOP`) are
//! looked up by name in the interface's `SIOCGIWPRIV` table and invoked with
//! an `iw_point` payload. A plain datagram socket serves as the ioctl handle.

use crate::softap::CommandSink;
use libc::{c_char, c_void, IFNAMSIZ};
use nix::sys::socket::{socket, AddressFamily, SockFlag, SockProtocol, SockType};
use std::io;
use std::os::fd::{AsRawFd, OwnedFd};
use tracing::{debug, trace};

const SIOCGIWPRIV: u32 = 0x8B0D;
/// Initial private table size; grown once if the driver reports E2BIG.
const PRIV_TABLE_LEN: usize = 128;

#[repr(C)]
#[derive(Clone, Copy)]
#[allow(dead_code)]
struct IwPoint {
    pointer: *mut c_void,
    length: u16,
    flags: u16,
}

#[repr(C)]
union IwReqData {
    data: IwPoint,
    _pad: [u8; 16],
}

#[repr(C)]
struct IwReq {
    ifr_name: [c_char; IFNAMSIZ],
    u: IwReqData,
}

impl IwReq {
    fn new(iface: &str, pointer: *mut c_void, length: u16) -> io::Result<Self> {
        Ok(Self {
            ifr_name: ifname(iface)?,
            u: IwReqData {
                data: IwPoint {
                    pointer,
                    length,
                    flags: 0,
                },
            },
        })
    }

    fn length(&self) -> u16 {
        // SAFETY: every IwReq is built through `new`, which initialises `data`.
        unsafe { self.u.data.length }
    }
}

#[repr(C)]
#[derive(Clone, Copy)]
#[allow(dead_code)]
struct IwPrivArgs {
    cmd: u32,
    set_args: u16,
    get_args: u16,
    name: [c_char; IFNAMSIZ],
}

impl IwPrivArgs {
    const EMPTY: Self = Self {
        cmd: 0,
        set_args: 0,
        get_args: 0,
        name: [0; IFNAMSIZ],
    };
}

fn ifname(iface: &str) -> io::Result<[c_char; IFNAMSIZ]> {
    let bytes = iface.as_bytes();
    if bytes.is_empty() || bytes.len() >= IFNAMSIZ || bytes.contains(&0) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid interface name {iface:?}"),
        ));
    }
    let mut name = [0 as c_char; IFNAMSIZ];
    for (dst, src) in name.iter_mut().zip(bytes) {
        *dst = *src as c_char;
    }
    Ok(name)
}

fn c_name_eq(raw: &[c_char], name: &str) -> bool {
    let len = raw.iter().position(|&c| c == 0).unwrap_or(raw.len());
    raw[..len].iter().map(|&c| c as u8).eq(name.bytes())
}

/// Control socket for wireless-extensions ioctls.
#[derive(Debug)]
pub struct WextControl {
    sock: OwnedFd,
}

impl WextControl {
    pub fn open() -> io::Result<Self> {
        let sock = socket(
            AddressFamily::Inet,
            SockType::Datagram,
            SockFlag::SOCK_CLOEXEC,
            None::<SockProtocol>,
        )
        .map_err(io::Error::from)?;
        Ok(Self { sock })
    }

    fn ioctl(&self, request: u32, req: &mut IwReq) -> io::Result<()> {
        // SAFETY: `req` is a repr(C) iwreq; its data pointer, when set, refers
        // to a buffer owned by the caller that outlives this call.
        let ret = unsafe { libc::ioctl(self.sock.as_raw_fd(), request as _, req as *mut IwReq) };
        if ret < 0 {
            Err(io::Error::last_os_error())
        } else {
            Ok(())
        }
    }

    /// Ioctl number of the private function `name` on `iface`, if exported.
    pub fn private_function(&self, iface: &str, name: &str) -> io::Result<Option<u32>> {
        let mut slots = PRIV_TABLE_LEN;
        for _ in 0..2 {
            let mut table = vec![IwPrivArgs::EMPTY; slots];
            let len = u16::try_from(slots).unwrap_or(u16::MAX);
            let mut req = IwReq::new(iface, table.as_mut_ptr().cast(), len)?;
            match self.ioctl(SIOCGIWPRIV, &mut req) {
                Ok(()) => {
                    let count = usize::from(req.length()).min(table.len());
                    trace!(iface, count, "private table read");
                    return Ok(table[..count]
                        .iter()
                        .find(|arg| c_name_eq(&arg.name, name))
                        .map(|arg| arg.cmd));
                }
                Err(e)
                    if e.raw_os_error() == Some(libc::E2BIG)
                        && usize::from(req.length()) > slots =>
                {
                    debug!(iface, wanted = req.length(), "private table larger than buffer; retrying");
                    slots = usize::from(req.length());
                }
                Err(e) => return Err(e),
            }
        }
        Err(io::Error::new(
            io::ErrorKind::Other,
            format!("{iface}: private table size kept changing"),
        ))
    }

    /// Invoke private function `function` on `iface`. A non-empty payload is
    /// passed as a NUL-terminated string; an empty one with length 0.
    pub fn private_call(&self, iface: &str, function: &str, payload: &[u8]) -> io::Result<()> {
        let cmd = self.private_function(iface, function)?.ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::Unsupported,
                format!("{iface}: private function {function} not supported"),
            )
        })?;

        let mut data = Vec::with_capacity(payload.len() + 1);
        data.extend_from_slice(payload);
        data.push(0);
        let length = if payload.is_empty() {
            0
        } else {
            u16::try_from(data.len()).map_err(|_| {
                io::Error::new(io::ErrorKind::InvalidInput, "payload too large for iw_point")
            })?
        };

        let mut req = IwReq::new(iface, data.as_mut_ptr().cast(), length)?;
        debug!(iface, function, cmd, length, "private ioctl");
        self.ioctl(cmd, &mut req)
    }
}

/// [`CommandSink`] bound to one named private function.
pub struct PrivateFnSink<'a> {
    control: &'a WextControl,
    function: &'a str,
}

impl<'a> PrivateFnSink<'a> {
    pub fn new(control: &'a WextControl, function: &'a str) -> Self {
        Self { control, function }
    }
}

impl CommandSink for PrivateFnSink<'_> {
    fn send(&mut self, iface: &str, payload: &[u8]) -> io::Result<()> {
        self.control.private_call(iface, self.function, payload)
    }
}
