//! Provider adapters driven end to end through `Client`, with canned
//! payloads in place of the remote services.

mod common;

mod assignment;
mod bulk_data;
mod epo;
mod odp;
