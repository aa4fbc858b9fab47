//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::{Ipv4Addr, Ipv6Addr};

use bytes::{Buf, BufMut, Bytes, BytesMut, TryGetError};

use crate::consts::VARLEN_LONG_FORM;

// Extension methods for Bytes.
pub trait BytesExt {
    /// Gets an IPv4 addr from `self` in big-endian byte order.
    ///
    /// The current position is advanced by 4.
    fn try_get_ipv4(&mut self) -> Result<Ipv4Addr, TryGetError>;

    /// Gets an IPv6 addr from `self` in big-endian byte order.
    ///
    /// The current position is advanced by 16.
    fn try_get_ipv6(&mut self) -> Result<Ipv6Addr, TryGetError>;

    /// Gets a variable-length field length prefix from `self`.
    ///
    /// The current position is advanced by 1, or by 3 when the first octet
    /// is the long-form escape.
    fn try_get_varlen(&mut self) -> Result<usize, TryGetError>;
}

// Extension methods for BytesMut.
pub trait BytesMutExt {
    /// Writes an IPv4 addr to `self` in big-endian byte order.
    ///
    /// The current position is advanced by 4.
    fn put_ipv4(&mut self, addr: &Ipv4Addr);

    /// Writes an IPv6 addr to `self` in big-endian byte order.
    ///
    /// The current position is advanced by 16.
    fn put_ipv6(&mut self, addr: &Ipv6Addr);

    /// Writes a variable-length field length prefix to `self`, using the
    /// one-octet form whenever the length permits.
    ///
    /// The current position is advanced by 1 or 3.
    fn put_varlen(&mut self, len: usize);
}

// ===== impl Bytes =====

impl BytesExt for Bytes {
    fn try_get_ipv4(&mut self) -> Result<Ipv4Addr, TryGetError> {
        Ok(Ipv4Addr::from(self.try_get_u32()?))
    }

    fn try_get_ipv6(&mut self) -> Result<Ipv6Addr, TryGetError> {
        Ok(Ipv6Addr::from(self.try_get_u128()?))
    }

    fn try_get_varlen(&mut self) -> Result<usize, TryGetError> {
        let len = self.try_get_u8()?;
        if len < VARLEN_LONG_FORM {
            Ok(len as usize)
        } else {
            Ok(self.try_get_u16()? as usize)
        }
    }
}

// ===== impl BytesMut =====

impl BytesMutExt for BytesMut {
    fn put_ipv4(&mut self, addr: &Ipv4Addr) {
        self.put_u32((*addr).into())
    }

    fn put_ipv6(&mut self, addr: &Ipv6Addr) {
        self.put_slice(&addr.octets())
    }

    fn put_varlen(&mut self, len: usize) {
        debug_assert!(len <= u16::MAX as usize);
        if len < VARLEN_LONG_FORM as usize {
            self.put_u8(len as u8);
        } else {
            self.put_u8(VARLEN_LONG_FORM);
            self.put_u16(len as u16);
        }
    }
}
