//! Zap receipt parsing.
//!
//! A zap receipt (kind 9735) is published by the recipient's lightning
//! service once an invoice is paid. The receipt carries:
//!
//! - a `bolt11` tag with the paid invoice (our dedup key, and the source
//!   of the amount via the invoice's human-readable part);
//! - a `description` tag with the original zap request (kind 9734) as
//!   JSON, whose author is the payer and whose content is the comment;
//! - an `e` tag naming the zapped note;
//! - optionally an uppercase `P` tag with the payer, used as a fallback
//!   when the description is missing or unparseable.
//!
//! Receipts missing any required piece are skipped, never an error: a
//! malformed receipt from a broken zapper must not poison the fold.

use nostr::{Event, EventId, Kind, PublicKey};
use serde::Serialize;

use crate::tags::first_tag_value;

/// A zap folded into a note's statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Zap {
    /// The paid bolt11 invoice. Unique per payment, so it doubles as the
    /// deduplication key under re-delivery.
    pub invoice: String,
    /// Who paid.
    pub payer: PublicKey,
    /// Amount in sats.
    pub amount: u64,
    /// Comment from the zap request, if any.
    pub comment: Option<String>,
}

/// A zap receipt reduced to the zapped note and the [`Zap`] itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReceipt {
    /// The note the zap targets.
    pub target: EventId,
    pub zap: Zap,
}

/// Parse a kind-9735 event into the note it targets and the zap it carries.
///
/// Returns `None` for any other kind and for receipts missing the invoice,
/// target, payer, or a parseable amount.
pub fn parse_zap_receipt(event: &Event) -> Option<ParsedReceipt> {
    if event.kind != Kind::ZapReceipt {
        return None;
    }

    let Some(invoice) = first_tag_value(event, "bolt11") else {
        tracing::debug!(receipt = %event.id, "zap receipt without bolt11 tag");
        return None;
    };

    let Some(amount) = invoice_amount_sats(invoice) else {
        tracing::debug!(receipt = %event.id, "zap receipt with amountless invoice");
        return None;
    };

    let Some(target) = first_tag_value(event, "e").and_then(|v| EventId::from_hex(v).ok()) else {
        tracing::debug!(receipt = %event.id, "zap receipt without target note");
        return None;
    };

    // The embedded zap request identifies the payer; older zappers only set
    // the uppercase P tag.
    let request: Option<serde_json::Value> =
        first_tag_value(event, "description").and_then(|d| serde_json::from_str(d).ok());
    let payer = request
        .as_ref()
        .and_then(|r| r.get("pubkey"))
        .and_then(|p| p.as_str())
        .and_then(|p| PublicKey::from_hex(p).ok())
        .or_else(|| first_tag_value(event, "P").and_then(|p| PublicKey::from_hex(p).ok()));
    let Some(payer) = payer else {
        tracing::debug!(receipt = %event.id, "zap receipt without payer");
        return None;
    };

    let comment = request
        .as_ref()
        .and_then(|r| r.get("content"))
        .and_then(|c| c.as_str())
        .filter(|c| !c.is_empty())
        .map(str::to_owned);

    Some(ParsedReceipt {
        target,
        zap: Zap {
            invoice: invoice.to_owned(),
            payer,
            amount,
            comment,
        },
    })
}

/// Amount in sats encoded in a bolt11 invoice's human-readable part.
///
/// The HRP is everything before the last `1` separator: a network prefix
/// followed by an optional amount (digits plus a `m`/`u`/`n`/`p` multiplier
/// of one BTC). Returns `None` for amountless invoices and for amounts that
/// do not resolve to a whole number of millisats.
fn invoice_amount_sats(invoice: &str) -> Option<u64> {
    let lower = invoice.to_ascii_lowercase();
    let hrp = &lower[..lower.rfind('1')?];

    let amount = hrp
        .strip_prefix("lnbcrt")
        .or_else(|| hrp.strip_prefix("lntbs"))
        .or_else(|| hrp.strip_prefix("lntb"))
        .or_else(|| hrp.strip_prefix("lnbc"))?;
    if amount.is_empty() {
        return None;
    }

    let (digits, multiplier) = match amount.bytes().last() {
        Some(m @ (b'm' | b'u' | b'n' | b'p')) => (&amount[..amount.len() - 1], Some(m)),
        _ => (amount, None),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let value: u64 = digits.parse().ok()?;

    let msats = match multiplier {
        Some(b'm') => value.checked_mul(100_000_000)?,
        Some(b'u') => value.checked_mul(100_000)?,
        Some(b'n') => value.checked_mul(100)?,
        // Pico: a tenth of a millisat per unit, so reject sub-millisat amounts.
        Some(b'p') => {
            if value % 10 != 0 {
                return None;
            }
            value / 10
        }
        Some(_) => unreachable!("matched above"),
        None => value.checked_mul(100_000_000_000)?,
    };

    Some(msats / 1000)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nostr::{EventBuilder, Keys, Tag, TagKind};

    fn note_id(n: u8) -> EventId {
        EventId::from_slice(&[n; 32]).unwrap()
    }

    fn receipt(tags: Vec<Tag>) -> Event {
        // Receipts are signed by the zapper service, not the payer.
        let zapper = Keys::generate();
        EventBuilder::new(Kind::ZapReceipt, "")
            .tags(tags)
            .sign_with_keys(&zapper)
            .unwrap()
    }

    fn request_json(payer: &Keys, comment: &str) -> String {
        serde_json::json!({
            "kind": 9734,
            "pubkey": payer.public_key().to_hex(),
            "content": comment,
            "tags": [],
        })
        .to_string()
    }

    #[test]
    fn amount_multipliers() {
        assert_eq!(invoice_amount_sats("lnbc2500u1pvjluez"), Some(250_000));
        assert_eq!(invoice_amount_sats("lnbc1m1pvjluez"), Some(100_000));
        assert_eq!(invoice_amount_sats("lnbc10n1pvjluez"), Some(1));
        assert_eq!(invoice_amount_sats("lnbc2500n1pvjluez"), Some(250));
        assert_eq!(invoice_amount_sats("lnbc10000p1pvjluez"), Some(1));
        // No multiplier means whole BTC.
        assert_eq!(invoice_amount_sats("lnbc21pvjluez"), Some(200_000_000));
    }

    #[test]
    fn amount_rejects_degenerate_invoices() {
        // Amountless invoice.
        assert_eq!(invoice_amount_sats("lnbc1pvjluez"), None);
        // Sub-millisat pico amount.
        assert_eq!(invoice_amount_sats("lnbc5p1pvjluez"), None);
        // Not a lightning invoice at all.
        assert_eq!(invoice_amount_sats("definitely not"), None);
        assert_eq!(invoice_amount_sats(""), None);
    }

    #[test]
    fn amount_accepts_testnet_prefixes() {
        assert_eq!(invoice_amount_sats("lntb2500u1pvjluez"), Some(250_000));
        assert_eq!(invoice_amount_sats("lnbcrt10n1pvjluez"), Some(1));
        assert_eq!(invoice_amount_sats("lntbs1m1pvjluez"), Some(100_000));
    }

    #[test]
    fn receipt_with_description_yields_payer_and_comment() {
        let payer = Keys::generate();
        let target = note_id(7);
        let event = receipt(vec![
            Tag::event(target),
            Tag::custom(TagKind::custom("bolt11"), ["lnbc2500u1pvjluez"]),
            Tag::custom(
                TagKind::custom("description"),
                [request_json(&payer, "great post")],
            ),
        ]);

        let parsed = parse_zap_receipt(&event).unwrap();
        assert_eq!(parsed.target, target);
        assert_eq!(parsed.zap.payer, payer.public_key());
        assert_eq!(parsed.zap.amount, 250_000);
        assert_eq!(parsed.zap.comment.as_deref(), Some("great post"));
        assert_eq!(parsed.zap.invoice, "lnbc2500u1pvjluez");
    }

    #[test]
    fn empty_comment_becomes_none() {
        let payer = Keys::generate();
        let event = receipt(vec![
            Tag::event(note_id(7)),
            Tag::custom(TagKind::custom("bolt11"), ["lnbc10n1pvjluez"]),
            Tag::custom(TagKind::custom("description"), [request_json(&payer, "")]),
        ]);

        let parsed = parse_zap_receipt(&event).unwrap();
        assert_eq!(parsed.zap.comment, None);
    }

    #[test]
    fn payer_falls_back_to_uppercase_p_tag() {
        let payer = Keys::generate();
        let event = receipt(vec![
            Tag::event(note_id(7)),
            Tag::custom(TagKind::custom("bolt11"), ["lnbc10n1pvjluez"]),
            Tag::custom(TagKind::custom("description"), ["not json"]),
            Tag::custom(
                TagKind::custom("P"),
                [payer.public_key().to_hex()],
            ),
        ]);

        let parsed = parse_zap_receipt(&event).unwrap();
        assert_eq!(parsed.zap.payer, payer.public_key());
        assert_eq!(parsed.zap.comment, None);
    }

    #[test]
    fn incomplete_receipts_are_skipped() {
        let payer = Keys::generate();

        // No bolt11.
        let event = receipt(vec![
            Tag::event(note_id(1)),
            Tag::custom(
                TagKind::custom("description"),
                [request_json(&payer, "hi")],
            ),
        ]);
        assert_eq!(parse_zap_receipt(&event), None);

        // No target note.
        let event = receipt(vec![
            Tag::custom(TagKind::custom("bolt11"), ["lnbc10n1pvjluez"]),
            Tag::custom(
                TagKind::custom("description"),
                [request_json(&payer, "hi")],
            ),
        ]);
        assert_eq!(parse_zap_receipt(&event), None);

        // No payer anywhere.
        let event = receipt(vec![
            Tag::event(note_id(1)),
            Tag::custom(TagKind::custom("bolt11"), ["lnbc10n1pvjluez"]),
        ]);
        assert_eq!(parse_zap_receipt(&event), None);
    }

    #[test]
    fn non_receipt_kinds_are_ignored() {
        let keys = Keys::generate();
        let event = EventBuilder::new(Kind::TextNote, "gm")
            .sign_with_keys(&keys)
            .unwrap();
        assert_eq!(parse_zap_receipt(&event), None);
    }
}
