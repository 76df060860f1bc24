//! Decoding of the program's Anchor events from transaction logs.
//!
//! Events are emitted as `Program data: <base64>` log lines; the payload is
//! an 8-byte event discriminator (`sha256("event:<Name>")[..8]`) followed by
//! the borsh encoding of the event struct. Lines that do not carry a known
//! event are skipped.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use borsh::BorshDeserialize;
use solana_sdk::pubkey::Pubkey;
use solana_transaction_status::option_serializer::OptionSerializer;
use solana_transaction_status::EncodedConfirmedTransactionWithStatusMeta;

const PROGRAM_DATA_PREFIX: &str = "Program data: ";

#[derive(Debug, Clone, BorshDeserialize)]
pub struct FairLaunchDrawEvent {
    pub user: Pubkey,
    pub draw_id: u64,
    pub draw_price: u64,
    pub time: i64,
}

#[derive(Debug, Clone, BorshDeserialize)]
pub struct FairLaunchClaimEvent {
    pub user: Pubkey,
    pub draw_id: u64,
    pub claim_amount: u64,
    pub time: i64,
}

#[derive(Debug, Clone, BorshDeserialize)]
pub struct FairLaunchRefundEvent {
    pub user: Pubkey,
    pub draw_id: u64,
    pub refund_amount: u64,
    pub time: i64,
}

#[derive(Debug, Clone, BorshDeserialize)]
pub struct FairLaunchStarted {
    pub slot: u64,
    pub time: i64,
}

#[derive(Debug, Clone, BorshDeserialize)]
pub struct LuckyBoxMintNftEvent {
    pub user: Pubkey,
    pub nft_mint: Pubkey,
    pub referrer: Pubkey,
    pub nft_id: u64,
    pub time: i64,
}

#[derive(Debug, Clone)]
pub enum MathsolEvent {
    FairLaunchDraw(FairLaunchDrawEvent),
    FairLaunchClaim(FairLaunchClaimEvent),
    FairLaunchRefund(FairLaunchRefundEvent),
    FairLaunchStarted(FairLaunchStarted),
    LuckyBoxMintNft(LuckyBoxMintNftEvent),
}

const DRAW_EVENT: [u8; 8] = [0x97, 0x43, 0xe8, 0x46, 0x42, 0x89, 0x37, 0x4b];
const CLAIM_EVENT: [u8; 8] = [0x30, 0xe0, 0x40, 0xa2, 0x75, 0x8f, 0x3a, 0x9d];
const REFUND_EVENT: [u8; 8] = [0xeb, 0xfd, 0x31, 0xf7, 0xb3, 0xce, 0x29, 0x05];
const STARTED_EVENT: [u8; 8] = [0x2e, 0xa3, 0xb5, 0x19, 0x4b, 0xca, 0x39, 0x6a];
const MINT_NFT_EVENT: [u8; 8] = [0x8c, 0xcb, 0x3e, 0x40, 0x33, 0xa9, 0x9f, 0xd5];

fn decode_one(payload: &[u8]) -> Option<MathsolEvent> {
    if payload.len() < 8 {
        return None;
    }
    let (disc, body) = payload.split_at(8);
    match <[u8; 8]>::try_from(disc).ok()? {
        DRAW_EVENT => FairLaunchDrawEvent::try_from_slice(body)
            .ok()
            .map(MathsolEvent::FairLaunchDraw),
        CLAIM_EVENT => FairLaunchClaimEvent::try_from_slice(body)
            .ok()
            .map(MathsolEvent::FairLaunchClaim),
        REFUND_EVENT => FairLaunchRefundEvent::try_from_slice(body)
            .ok()
            .map(MathsolEvent::FairLaunchRefund),
        STARTED_EVENT => FairLaunchStarted::try_from_slice(body)
            .ok()
            .map(MathsolEvent::FairLaunchStarted),
        MINT_NFT_EVENT => LuckyBoxMintNftEvent::try_from_slice(body)
            .ok()
            .map(MathsolEvent::LuckyBoxMintNft),
        _ => None,
    }
}

/// Extracts every Mathsol event from a transaction's log messages.
pub fn parse_events(logs: &[String]) -> Vec<MathsolEvent> {
    logs.iter()
        .filter_map(|line| line.strip_prefix(PROGRAM_DATA_PREFIX))
        .filter_map(|b64| BASE64.decode(b64).ok())
        .filter_map(|payload| decode_one(&payload))
        .collect()
}

/// Convenience accessor for fetched transactions.
pub fn transaction_events(tx: &EncodedConfirmedTransactionWithStatusMeta) -> Vec<MathsolEvent> {
    match &tx.transaction.meta {
        Some(meta) => match &meta.log_messages {
            OptionSerializer::Some(logs) => parse_events(logs),
            _ => vec![],
        },
        None => vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use borsh::BorshSerialize;

    fn event_log<T: BorshSerialize>(discriminator: [u8; 8], event: &T) -> String {
        let mut payload = discriminator.to_vec();
        event.serialize(&mut payload).unwrap();
        format!("{PROGRAM_DATA_PREFIX}{}", BASE64.encode(payload))
    }

    #[derive(BorshSerialize)]
    struct RawDraw {
        user: Pubkey,
        draw_id: u64,
        draw_price: u64,
        time: i64,
    }

    #[test]
    fn draw_event_is_parsed_out_of_surrounding_logs() {
        let user = Pubkey::new_unique();
        let raw = RawDraw {
            user,
            draw_id: 41,
            draw_price: 1_000_000,
            time: 1_700_000_000,
        };
        let logs = vec![
            "Program 4Mhnc3XvRMEbKYns84dhtEgPjA9ZATcwgDGb2dNdARmF invoke [1]".to_string(),
            event_log(DRAW_EVENT, &raw),
            "Program 4Mhnc3XvRMEbKYns84dhtEgPjA9ZATcwgDGb2dNdARmF success".to_string(),
        ];

        let events = parse_events(&logs);
        assert_eq!(events.len(), 1);
        match &events[0] {
            MathsolEvent::FairLaunchDraw(event) => {
                assert_eq!(event.user, user);
                assert_eq!(event.draw_id, 41);
                assert_eq!(event.draw_price, 1_000_000);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn unknown_payloads_are_skipped() {
        let logs = vec![
            format!("{PROGRAM_DATA_PREFIX}{}", BASE64.encode([0u8; 4])),
            format!("{PROGRAM_DATA_PREFIX}{}", BASE64.encode([0xffu8; 16])),
            "Program log: not an event".to_string(),
        ];
        assert!(parse_events(&logs).is_empty());
    }
}
