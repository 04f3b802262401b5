/// Framed binary codec for requests and replies.
///
/// Frame layout (all integers big endian):
/// ```text
/// frame   := u32 body-length | body
/// body    := u8 version (=1) | u8 kind | ...
/// request := kind 0x00 | u8 command | info | u8 payload-flag [| u32 len | bytes]
/// reply   := kind 0x01 | u8 status | info | u16 count | count * (u32 len | bytes)
/// info    := u8 tag: 0 none | 1 session id (u64) | 2 role (u8)
///                  | 3 session list (u16 count | count * u64)
/// ```
///
/// Decoding is strict: unknown tags, a foreign version, a truncated body,
/// or bytes left over after the announced fields all fail with a
/// `ProtocolError` instead of producing a value.
use bytes::{Buf, BufMut, Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use super::constants::{Command, Role, Status};
use super::error::ProtocolError;
use super::message::{AdditionalInfo, Reply, Request};
use crate::config::session::MAX_FRAME_SIZE;

/// Version byte every frame opens with.
pub const PROTOCOL_VERSION: u8 = 1;

const KIND_REQUEST: u8 = 0x00;
const KIND_REPLY: u8 = 0x01;

const INFO_NONE: u8 = 0;
const INFO_SESSION_ID: u8 = 1;
const INFO_ROLE: u8 = 2;
const INFO_SESSIONS: u8 = 3;

// Cursor helpers. `Bytes` getters panic on underrun, so every read is
// length-checked first.

fn take_u8(buf: &mut Bytes) -> Result<u8, ProtocolError> {
    if buf.remaining() < 1 {
        return Err(ProtocolError::Truncated);
    }
    Ok(buf.get_u8())
}

fn take_u16(buf: &mut Bytes) -> Result<u16, ProtocolError> {
    if buf.remaining() < 2 {
        return Err(ProtocolError::Truncated);
    }
    Ok(buf.get_u16())
}

fn take_u32(buf: &mut Bytes) -> Result<u32, ProtocolError> {
    if buf.remaining() < 4 {
        return Err(ProtocolError::Truncated);
    }
    Ok(buf.get_u32())
}

fn take_u64(buf: &mut Bytes) -> Result<u64, ProtocolError> {
    if buf.remaining() < 8 {
        return Err(ProtocolError::Truncated);
    }
    Ok(buf.get_u64())
}

fn take_bytes(buf: &mut Bytes, len: usize) -> Result<Bytes, ProtocolError> {
    if buf.remaining() < len {
        return Err(ProtocolError::Truncated);
    }
    Ok(buf.split_to(len))
}

fn put_info(body: &mut BytesMut, info: &AdditionalInfo) {
    match info {
        AdditionalInfo::None => body.put_u8(INFO_NONE),
        AdditionalInfo::SessionId(id) => {
            body.put_u8(INFO_SESSION_ID);
            body.put_u64(*id);
        }
        AdditionalInfo::Role(role) => {
            body.put_u8(INFO_ROLE);
            body.put_u8(*role as u8);
        }
        AdditionalInfo::Sessions(ids) => {
            body.put_u8(INFO_SESSIONS);
            body.put_u16(ids.len() as u16);
            for id in ids {
                body.put_u64(*id);
            }
        }
    }
}

fn take_info(buf: &mut Bytes) -> Result<AdditionalInfo, ProtocolError> {
    match take_u8(buf)? {
        INFO_NONE => Ok(AdditionalInfo::None),
        INFO_SESSION_ID => Ok(AdditionalInfo::SessionId(take_u64(buf)?)),
        INFO_ROLE => {
            let tag = take_u8(buf)?;
            let role = Role::from_u8(tag).ok_or(ProtocolError::UnknownTag {
                field: "role",
                value: tag,
            })?;
            Ok(AdditionalInfo::Role(role))
        }
        INFO_SESSIONS => {
            let count = take_u16(buf)? as usize;
            let mut ids = Vec::with_capacity(count);
            for _ in 0..count {
                ids.push(take_u64(buf)?);
            }
            Ok(AdditionalInfo::Sessions(ids))
        }
        value => Err(ProtocolError::UnknownTag {
            field: "additional info",
            value,
        }),
    }
}

fn frame_header(body: &mut BytesMut, kind: u8) {
    body.put_u8(PROTOCOL_VERSION);
    body.put_u8(kind);
}

fn check_header(buf: &mut Bytes, kind: u8) -> Result<(), ProtocolError> {
    let version = take_u8(buf)?;
    if version != PROTOCOL_VERSION {
        return Err(ProtocolError::UnsupportedVersion(version));
    }
    let found = take_u8(buf)?;
    if found != kind {
        return Err(ProtocolError::UnexpectedKind(found));
    }
    Ok(())
}

fn finish_frame(body: BytesMut, dst: &mut BytesMut) -> Result<(), ProtocolError> {
    if body.len() > MAX_FRAME_SIZE {
        return Err(ProtocolError::FrameTooLarge(body.len()));
    }
    dst.reserve(4 + body.len());
    dst.put_u32(body.len() as u32);
    dst.extend_from_slice(&body);
    Ok(())
}

/// Pulls one complete length-prefixed body off the stream buffer, or None
/// if a full frame has not arrived yet. Oversized length prefixes are
/// rejected here, before any buffering of the body.
fn next_body(src: &mut BytesMut) -> Result<Option<Bytes>, ProtocolError> {
    if src.len() < 4 {
        return Ok(None);
    }
    let len = u32::from_be_bytes([src[0], src[1], src[2], src[3]]) as usize;
    if len > MAX_FRAME_SIZE {
        return Err(ProtocolError::FrameTooLarge(len));
    }
    if src.len() < 4 + len {
        src.reserve(4 + len - src.len());
        return Ok(None);
    }
    src.advance(4);
    Ok(Some(src.split_to(len).freeze()))
}

pub fn encode_request(req: &Request, dst: &mut BytesMut) -> Result<(), ProtocolError> {
    let mut body = BytesMut::with_capacity(16);
    frame_header(&mut body, KIND_REQUEST);
    body.put_u8(req.command as u8);
    put_info(&mut body, &req.additional_info);
    match &req.payload {
        None => body.put_u8(0),
        Some(payload) => {
            body.put_u8(1);
            body.put_u32(payload.len() as u32);
            body.extend_from_slice(payload);
        }
    }
    finish_frame(body, dst)
}

pub fn decode_request(mut body: Bytes) -> Result<Request, ProtocolError> {
    check_header(&mut body, KIND_REQUEST)?;
    let tag = take_u8(&mut body)?;
    let command = Command::from_u8(tag).ok_or(ProtocolError::UnknownTag {
        field: "command",
        value: tag,
    })?;
    let additional_info = take_info(&mut body)?;
    let payload = match take_u8(&mut body)? {
        0 => None,
        1 => {
            let len = take_u32(&mut body)? as usize;
            Some(take_bytes(&mut body, len)?)
        }
        value => {
            return Err(ProtocolError::UnknownTag {
                field: "payload flag",
                value,
            });
        }
    };
    if body.has_remaining() {
        return Err(ProtocolError::TrailingBytes(body.remaining()));
    }
    Ok(Request {
        command,
        additional_info,
        payload,
    })
}

pub fn encode_reply(reply: &Reply, dst: &mut BytesMut) -> Result<(), ProtocolError> {
    let mut body = BytesMut::with_capacity(16);
    frame_header(&mut body, KIND_REPLY);
    body.put_u8(reply.status as u8);
    put_info(&mut body, &reply.additional_info);
    body.put_u16(reply.payload_list.len() as u16);
    for payload in &reply.payload_list {
        body.put_u32(payload.len() as u32);
        body.extend_from_slice(payload);
    }
    finish_frame(body, dst)
}

pub fn decode_reply(mut body: Bytes) -> Result<Reply, ProtocolError> {
    check_header(&mut body, KIND_REPLY)?;
    let tag = take_u8(&mut body)?;
    let status = Status::from_u8(tag).ok_or(ProtocolError::UnknownTag {
        field: "status",
        value: tag,
    })?;
    let additional_info = take_info(&mut body)?;
    let count = take_u16(&mut body)? as usize;
    let mut payload_list = Vec::with_capacity(count);
    for _ in 0..count {
        let len = take_u32(&mut body)? as usize;
        payload_list.push(take_bytes(&mut body, len)?);
    }
    if body.has_remaining() {
        return Err(ProtocolError::TrailingBytes(body.remaining()));
    }
    Ok(Reply {
        status,
        additional_info,
        payload_list,
    })
}

/// Server-side codec: decodes requests off the stream, encodes replies.
#[derive(Debug, Default)]
pub struct RelayCodec;

impl Decoder for RelayCodec {
    type Item = Request;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Request>, ProtocolError> {
        match next_body(src)? {
            Some(body) => Ok(Some(decode_request(body)?)),
            None => Ok(None),
        }
    }
}

impl Encoder<Reply> for RelayCodec {
    type Error = ProtocolError;

    fn encode(&mut self, reply: Reply, dst: &mut BytesMut) -> Result<(), ProtocolError> {
        encode_reply(&reply, dst)
    }
}

/// Client-side mirror of `RelayCodec`, used by test clients.
#[derive(Debug, Default)]
pub struct ClientCodec;

impl Decoder for ClientCodec {
    type Item = Reply;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Reply>, ProtocolError> {
        match next_body(src)? {
            Some(body) => Ok(Some(decode_reply(body)?)),
            None => Ok(None),
        }
    }
}

impl Encoder<Request> for ClientCodec {
    type Error = ProtocolError;

    fn encode(&mut self, req: Request, dst: &mut BytesMut) -> Result<(), ProtocolError> {
        encode_request(&req, dst)
    }
}
