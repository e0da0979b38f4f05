//! Composite protocol records.
//!
//! Each record is a fixed, ordered sequence of fields with no optional
//! parts.  Where the protocol has two shapes of the same thing (membership
//! in protocol version 10 and 11, text-stat with and without aux-items) the
//! shapes are separate types and the request that produced the reply
//! decides which one is decoded.

use std::io::Read;

use serde::Serialize;

use crate::protocol::bitstring::{
    AuxItemFlags, ConfType, ExtendedConfType, MembershipType, PersonalFlags, PrivBits,
    SessionFlags,
};
use crate::protocol::codec::{
    encode_fields, read_uint, AuxNo, ConfNo, Decode, Encode, GarbNice, LocalTextNo, PersNo,
    SessionNo, TextNo,
};
use crate::protocol::cursor::ByteCursor;
use crate::protocol::error::ProtocolError;
use crate::protocol::misc_info::CookedMiscInfo;
use crate::protocol::scalar::Hollerith;
use crate::protocol::time::Time;

/// Declares a record whose wire form is its fields in declaration order.
macro_rules! record {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $($(#[$fmeta:meta])* pub $field:ident : $ty:ty,)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Serialize)]
        pub struct $name {
            $($(#[$fmeta])* pub $field: $ty,)*
        }

        impl Decode for $name {
            fn decode<R: Read>(cursor: &mut ByteCursor<R>) -> Result<Self, ProtocolError> {
                // Struct fields are evaluated in source order.
                Ok(Self {
                    $($field: <$ty as Decode>::decode(cursor)?,)*
                })
            }
        }

        impl Encode for $name {
            fn encode(&self, out: &mut Vec<u8>) {
                encode_fields(out, &[$(&self.$field),*]);
            }
        }
    };
}

// ── Conferences and lookup ────────────────────────────────────────────────────

record! {
    /// One hit from lookup-z-name or re-z-lookup.
    pub struct ConfZInfo {
        pub name: Hollerith,
        pub conf_type: ConfType,
        pub conf_no: ConfNo,
    }
}

record! {
    /// Full conference status, from get-conf-stat.
    pub struct Conference {
        pub name: Hollerith,
        pub conf_type: ExtendedConfType,
        pub creation_time: Time,
        pub last_written: Time,
        pub creator: PersNo,
        pub presentation: TextNo,
        pub supervisor: ConfNo,
        pub permitted_submitters: ConfNo,
        pub super_conf: ConfNo,
        pub msg_of_day: TextNo,
        pub nice: GarbNice,
        pub keep_commented: GarbNice,
        pub no_of_members: u32,
        pub first_local_no: LocalTextNo,
        pub no_of_texts: u32,
        pub expire: GarbNice,
        pub aux_items: Vec<AuxItem>,
    }
}

record! {
    /// The small conference status, from get-uconf-stat.
    pub struct UConference {
        pub name: Hollerith,
        pub conf_type: ExtendedConfType,
        pub highest_local_no: LocalTextNo,
        pub nice: GarbNice,
    }
}

// ── Persons and memberships ───────────────────────────────────────────────────

record! {
    pub struct Person {
        pub username: Hollerith,
        pub privileges: PrivBits,
        pub flags: PersonalFlags,
        pub last_login: Time,
        pub user_area: TextNo,
        pub total_time_present: u32,
        pub sessions: u32,
        pub created_lines: u32,
        pub created_bytes: u32,
        pub read_texts: u32,
        pub no_of_text_fetches: u32,
        pub created_persons: u32,
        pub created_confs: u32,
        pub first_created_local_no: LocalTextNo,
        pub no_of_created_texts: u32,
        pub no_of_marks: u32,
        pub no_of_confs: u32,
    }
}

record! {
    /// Membership as reported by protocol version 10 calls: the read state
    /// is a "last read" mark plus a list of texts read after it.
    pub struct Membership10 {
        pub position: u32,
        pub last_time_read: Time,
        pub conference: ConfNo,
        pub priority: u8,
        pub last_text_read: LocalTextNo,
        pub read_texts: Vec<LocalTextNo>,
        pub added_by: PersNo,
        pub added_at: Time,
        pub membership_type: MembershipType,
    }
}

record! {
    /// An inclusive range of read local text numbers.
    pub struct ReadRange {
        pub first_read: LocalTextNo,
        pub last_read: LocalTextNo,
    }
}

record! {
    /// Membership as reported by protocol version 11 calls: the read state
    /// is a list of ranges.
    pub struct Membership11 {
        pub position: u32,
        pub last_time_read: Time,
        pub conference: ConfNo,
        pub priority: u8,
        pub read_ranges: Vec<ReadRange>,
        pub added_by: PersNo,
        pub added_at: Time,
        pub membership_type: MembershipType,
    }
}

record! {
    /// One member of a conference, from get-members.
    pub struct Member {
        pub member: PersNo,
        pub added_by: PersNo,
        pub added_at: Time,
        pub membership_type: MembershipType,
    }
}

// ── Texts ─────────────────────────────────────────────────────────────────────

record! {
    /// Aux-item as received.
    pub struct AuxItem {
        pub aux_no: AuxNo,
        pub tag: u32,
        pub creator: PersNo,
        pub created_at: Time,
        pub flags: AuxItemFlags,
        pub inherit_limit: u32,
        pub data: Hollerith,
    }
}

record! {
    /// Aux-item as sent when creating or modifying an object.  The server
    /// fills in the number, creator and creation time.
    pub struct AuxItemInput {
        pub tag: u32,
        pub flags: AuxItemFlags,
        pub inherit_limit: u32,
        pub data: Hollerith,
    }
}

impl AuxItemInput {
    pub fn new(tag: u32, data: impl Into<Hollerith>) -> Self {
        Self {
            tag,
            flags: AuxItemFlags::default(),
            inherit_limit: 0,
            data: data.into(),
        }
    }
}

impl From<&AuxItem> for AuxItemInput {
    fn from(item: &AuxItem) -> Self {
        Self {
            tag: item.tag,
            flags: item.flags,
            inherit_limit: item.inherit_limit,
            data: item.data.clone(),
        }
    }
}

/// All aux-items in `items` with the given tag, in order.
pub fn all_aux_items_with_tag(items: &[AuxItem], tag: u32) -> Vec<&AuxItem> {
    items.iter().filter(|item| item.tag == tag).collect()
}

/// The first aux-item in `items` with the given tag.
pub fn first_aux_item_with_tag(items: &[AuxItem], tag: u32) -> Option<&AuxItem> {
    items.iter().find(|item| item.tag == tag)
}

record! {
    /// Text status, from get-text-stat.
    pub struct TextStat {
        pub creation_time: Time,
        pub author: PersNo,
        pub no_of_lines: u32,
        pub no_of_chars: u32,
        pub no_of_marks: u32,
        pub misc_info: CookedMiscInfo,
        pub aux_items: Vec<AuxItem>,
    }
}

impl TextStat {
    /// Decodes the old text-stat shape, which ends after the misc-info.
    /// The result has no aux-items.
    pub fn decode_old<R: Read>(cursor: &mut ByteCursor<R>) -> Result<Self, ProtocolError> {
        Ok(Self {
            creation_time: Time::decode(cursor)?,
            author: PersNo::decode(cursor)?,
            no_of_lines: u32::decode(cursor)?,
            no_of_chars: u32::decode(cursor)?,
            no_of_marks: u32::decode(cursor)?,
            misc_info: CookedMiscInfo::decode(cursor)?,
            aux_items: Vec::new(),
        })
    }
}

record! {
    /// A block of a conference's text map, from get-map.
    pub struct TextList {
        pub first_local_no: LocalTextNo,
        pub texts: Vec<TextNo>,
    }
}

record! {
    pub struct TextNumberPair {
        pub local_number: LocalTextNo,
        pub global_number: TextNo,
    }
}

/// The two block layouts a text mapping can use.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextMappingBlock {
    /// Block type 0: explicit `(local, global)` pairs.
    Sparse(Vec<TextNumberPair>),
    /// Block type 1: consecutive local numbers from `first`, one global
    /// number each (0 where the text is gone).
    Dense { first: LocalTextNo, texts: Vec<TextNo> },
}

/// A range of a local-to-global text mapping.
///
/// `range_begin` is included; `range_end` is the first local number after
/// the range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextMapping {
    pub range_begin: LocalTextNo,
    pub range_end: LocalTextNo,
    pub later_texts_exists: bool,
    pub block: TextMappingBlock,
}

impl TextMapping {
    /// The mapping as ordered `(local, global)` pairs, whatever the layout.
    pub fn pairs(&self) -> Vec<(LocalTextNo, TextNo)> {
        match &self.block {
            TextMappingBlock::Sparse(pairs) => pairs
                .iter()
                .map(|p| (p.local_number, p.global_number))
                .collect(),
            // Local numbers past u32::MAX do not exist; the block ends there.
            TextMappingBlock::Dense { first, texts } => texts
                .iter()
                .enumerate()
                .map_while(|(i, &global)| {
                    let offset = u32::try_from(i).ok()?;
                    Some((LocalTextNo(first.0.checked_add(offset)?), global))
                })
                .collect(),
        }
    }

    /// The global number for `local`, if it is in this block.
    pub fn global(&self, local: LocalTextNo) -> Option<TextNo> {
        self.pairs()
            .into_iter()
            .find(|&(l, _)| l == local)
            .map(|(_, g)| g)
    }
}

impl Decode for TextMapping {
    fn decode<R: Read>(cursor: &mut ByteCursor<R>) -> Result<Self, ProtocolError> {
        let range_begin = LocalTextNo::decode(cursor)?;
        let range_end = LocalTextNo::decode(cursor)?;
        let later_texts_exists = bool::decode(cursor)?;
        let block_type: u32 = read_uint(cursor, "text mapping block type")?;
        let block = match block_type {
            0 => TextMappingBlock::Sparse(Vec::decode(cursor)?),
            1 => TextMappingBlock::Dense {
                first: LocalTextNo::decode(cursor)?,
                texts: Vec::decode(cursor)?,
            },
            other => {
                return Err(ProtocolError::malformed(format!(
                    "unknown text mapping block type {other}"
                )))
            }
        };
        Ok(Self {
            range_begin,
            range_end,
            later_texts_exists,
            block,
        })
    }
}

impl Encode for TextMapping {
    fn encode(&self, out: &mut Vec<u8>) {
        encode_fields(out, &[&self.range_begin, &self.range_end, &self.later_texts_exists]);
        match &self.block {
            TextMappingBlock::Sparse(pairs) => {
                out.extend_from_slice(b" 0 ");
                pairs.encode(out);
            }
            TextMappingBlock::Dense { first, texts } => {
                out.extend_from_slice(b" 1 ");
                encode_fields(out, &[first, texts]);
            }
        }
    }
}

record! {
    /// A marked text, from get-marks.
    pub struct Mark {
        pub text_no: TextNo,
        pub mark_type: u8,
    }
}

// ── Server information ────────────────────────────────────────────────────────

record! {
    /// Server information, from get-info.
    pub struct Info {
        pub version: u32,
        pub conf_pres_conf: ConfNo,
        pub pers_pres_conf: ConfNo,
        pub motd_conf: ConfNo,
        pub kom_news_conf: ConfNo,
        pub motd_of_lyskom: TextNo,
        pub aux_items: Vec<AuxItem>,
    }
}

record! {
    /// The writable part of [`Info`], as sent by set-info.
    pub struct InfoOld {
        pub version: u32,
        pub conf_pres_conf: ConfNo,
        pub pers_pres_conf: ConfNo,
        pub motd_conf: ConfNo,
        pub kom_news_conf: ConfNo,
        pub motd_of_lyskom: TextNo,
    }
}

impl From<&Info> for InfoOld {
    fn from(info: &Info) -> Self {
        Self {
            version: info.version,
            conf_pres_conf: info.conf_pres_conf,
            pers_pres_conf: info.pers_pres_conf,
            motd_conf: info.motd_conf,
            kom_news_conf: info.kom_news_conf,
            motd_of_lyskom: info.motd_of_lyskom,
        }
    }
}

record! {
    pub struct VersionInfo {
        pub protocol_version: u32,
        pub server_software: Hollerith,
        pub software_version: Hollerith,
    }
}

record! {
    /// Boot-time statistics, from get-boottime-info.
    pub struct StaticServerInfo {
        pub boot_time: Time,
        pub save_time: Time,
        pub db_status: Hollerith,
        pub existing_texts: u32,
        pub highest_text_no: TextNo,
        pub existing_confs: u32,
        pub existing_persons: u32,
        pub highest_conf_no: ConfNo,
    }
}

record! {
    pub struct StatsDescription {
        pub what: Vec<Hollerith>,
        pub when: Vec<u32>,
    }
}

record! {
    /// One measurement interval of a statistic, from get-stats.
    pub struct Stats {
        pub average: f64,
        pub ascent_rate: f64,
        pub descent_rate: f64,
    }
}

// ── Sessions ──────────────────────────────────────────────────────────────────

record! {
    /// One entry from who-is-on-dynamic.
    pub struct DynamicSessionInfo {
        pub session: SessionNo,
        pub person: PersNo,
        pub working_conference: ConfNo,
        pub idle_time: u32,
        pub flags: SessionFlags,
        pub what_am_i_doing: Hollerith,
    }
}

record! {
    pub struct StaticSessionInfo {
        pub username: Hollerith,
        pub hostname: Hollerith,
        pub ident_user: Hollerith,
        pub connection_time: Time,
    }
}

record! {
    pub struct SchedulingInfo {
        pub priority: u16,
        pub weight: u16,
    }
}

record! {
    /// The payload of an i-am-on message.
    pub struct WhoInfo {
        pub person: PersNo,
        pub working_conference: ConfNo,
        pub session: SessionNo,
        pub what_am_i_doing: Hollerith,
        pub username: Hollerith,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::codec::{decode_from_slice, encode_to_vec};
    use crate::protocol::misc_info::RecipientKind;

    const TIME: &str = "15 14 13 29 1 100 2 59 0";

    #[test]
    fn test_text_stat_with_misc_info_and_aux_items() {
        // Arrange
        let wire = format!(
            "{TIME} 6 3 77 0 2 {{ 0 6 6 3 }} 1 {{ 4 1 6 {TIME} 00000000 0 10Htext/plain }}\n"
        );

        // Act
        let stat: TextStat = decode_from_slice(wire.as_bytes()).unwrap();

        // Assert
        assert_eq!(stat.creation_time, Time::from_epoch(951_830_055));
        assert_eq!(stat.author, PersNo(6));
        assert_eq!(stat.no_of_lines, 3);
        assert_eq!(stat.no_of_chars, 77);
        assert_eq!(stat.misc_info.recipients[0].kind, RecipientKind::To);
        assert_eq!(stat.misc_info.recipients[0].loc_no, Some(LocalTextNo(3)));
        assert_eq!(stat.aux_items.len(), 1);
        assert_eq!(stat.aux_items[0].data, Hollerith::from("text/plain"));
    }

    #[test]
    fn test_old_text_stat_has_no_aux_items() {
        let wire = format!("{TIME} 6 3 77 0 1 {{ 0 6 }} 99\n");
        let mut cursor = ByteCursor::new(wire.as_bytes());

        let stat = TextStat::decode_old(&mut cursor).unwrap();

        assert!(stat.aux_items.is_empty());
        // The next value is still in the stream.
        assert_eq!(u32::decode(&mut cursor).unwrap(), 99);
    }

    #[test]
    fn test_conf_z_info_list() {
        let infos: Vec<ConfZInfo> =
            decode_from_slice(b"2 { 5Hbj\xf6rn 1001 6 4HKOM! 0000 14506 }").unwrap();

        assert_eq!(infos[0].name.to_latin1(), "bj\u{f6}rn");
        assert!(infos[0].conf_type.rd_prot && infos[0].conf_type.letterbox);
        assert_eq!(infos[1].conf_no, ConfNo(14506));
    }

    #[test]
    fn test_membership11_with_read_ranges() {
        let wire = format!("0 {TIME} 14506 255 2 {{ 1 10 12 20 }} 6 {TIME} 00000000 ");

        let membership: Membership11 = decode_from_slice(wire.as_bytes()).unwrap();

        assert_eq!(membership.conference, ConfNo(14506));
        assert_eq!(membership.priority, 255);
        assert_eq!(
            membership.read_ranges,
            vec![
                ReadRange {
                    first_read: LocalTextNo(1),
                    last_read: LocalTextNo(10)
                },
                ReadRange {
                    first_read: LocalTextNo(12),
                    last_read: LocalTextNo(20)
                },
            ]
        );
    }

    #[test]
    fn test_membership10_omitted_read_texts() {
        let wire = format!("3 {TIME} 6 100 41 0 * 6 {TIME} 01000000 ");

        let membership: Membership10 = decode_from_slice(wire.as_bytes()).unwrap();

        assert_eq!(membership.last_text_read, LocalTextNo(41));
        assert!(membership.read_texts.is_empty());
        assert!(membership.membership_type.passive);
    }

    #[test]
    fn test_sparse_text_mapping() {
        let mapping: TextMapping = decode_from_slice(b"1 8 1 0 2 { 1 100 5 130 }").unwrap();

        assert!(mapping.later_texts_exists);
        assert_eq!(
            mapping.pairs(),
            vec![(LocalTextNo(1), TextNo(100)), (LocalTextNo(5), TextNo(130))]
        );
        assert_eq!(mapping.global(LocalTextNo(5)), Some(TextNo(130)));
        assert_eq!(mapping.global(LocalTextNo(2)), None);
    }

    #[test]
    fn test_dense_text_mapping() {
        let mapping: TextMapping = decode_from_slice(b"10 13 0 1 10 3 { 200 0 202 }").unwrap();

        assert_eq!(
            mapping.pairs(),
            vec![
                (LocalTextNo(10), TextNo(200)),
                (LocalTextNo(11), TextNo(0)),
                (LocalTextNo(12), TextNo(202)),
            ]
        );
        assert_eq!(encode_to_vec(&mapping), b"10 13 0 1 10 3 { 200 0 202 }");
    }

    #[test]
    fn test_dense_text_mapping_stops_at_the_last_local_number() {
        let mapping: TextMapping =
            decode_from_slice(b"4294967295 0 0 1 4294967295 2 { 300 301 }").unwrap();

        assert_eq!(mapping.pairs(), vec![(LocalTextNo(u32::MAX), TextNo(300))]);
        assert_eq!(mapping.global(LocalTextNo(u32::MAX)), Some(TextNo(300)));
    }

    #[test]
    fn test_unknown_text_mapping_block_type_is_malformed() {
        let result: Result<TextMapping, _> = decode_from_slice(b"1 2 0 2 0 { }");
        assert!(matches!(result, Err(ProtocolError::Malformed(_))));
    }

    #[test]
    fn test_aux_item_input_encoding() {
        let mut input = AuxItemInput::new(1, "text/plain");
        input.flags.inherit = true;

        assert_eq!(encode_to_vec(&input), b"1 01000000 0 10Htext/plain");
    }

    #[test]
    fn test_aux_item_lookup_by_tag() {
        let wire = format!(
            "3 {{ 1 1 6 {TIME} 00000000 0 1Ha 2 7 6 {TIME} 00000000 0 1Hb 3 1 6 {TIME} 00000000 0 1Hc }}"
        );
        let items: Vec<AuxItem> = decode_from_slice(wire.as_bytes()).unwrap();

        let tagged = all_aux_items_with_tag(&items, 1);

        assert_eq!(tagged.len(), 2);
        assert_eq!(first_aux_item_with_tag(&items, 1).map(|i| i.aux_no), Some(AuxNo(1)));
        assert_eq!(first_aux_item_with_tag(&items, 7).map(|i| i.aux_no), Some(AuxNo(2)));
        assert!(first_aux_item_with_tag(&items, 99).is_none());
    }

    #[test]
    fn test_info_old_drops_aux_items() {
        let info: Info = decode_from_slice(b"10901 1 2 3 4 1001 0 *").unwrap();

        assert_eq!(encode_to_vec(&InfoOld::from(&info)), b"10901 1 2 3 4 1001");
    }

    #[test]
    fn test_stats_floats() {
        let stats: Vec<Stats> = decode_from_slice(b"1 { 0.5 1e-3 -2.0 }").unwrap();
        assert_eq!(stats[0].average, 0.5);
        assert_eq!(stats[0].ascent_rate, 0.001);
        assert_eq!(stats[0].descent_rate, -2.0);
    }

    #[test]
    fn test_records_serialize_with_latin1_text() {
        let info: VersionInfo = decode_from_slice(b"11 7Hlyskomd 5H2.1.2").unwrap();
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["server_software"], "lyskomd");
        assert_eq!(json["protocol_version"], 11);
    }
}
