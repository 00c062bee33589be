use crate::config::PrimerConfig;
use crate::error::PrimeError;
use aida_aux_db::AuxDb;
use aida_statedb::{BulkLoad, StateDb};
use aida_types::{PSEUDO_TX, WorldState};
use alloy::primitives::Address;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

fn approx_size_bytes(delta: &WorldState, deleted_accounts: usize) -> usize {
    delta.iter().map(|(_, acc)| 20 + 32 + 8 + acc.code.len() + acc.storage.len() * 64).sum::<usize>()
        + deleted_accounts * 20
}

/// Bulk-loads every account currently in `buffer` into `state`. When
/// `config.prime_random` is set, the address write order is shuffled by a
/// seeded PRNG first — this only changes insertion order, never the
/// resulting state root, since the root is computed over address-sorted
/// iteration regardless of bulk-load order.
fn flush_buffer<S: StateDb>(state: &mut S, buffer: &WorldState, config: &PrimerConfig, block: u64) -> Result<(), PrimeError> {
    if buffer.is_empty() {
        return Ok(());
    }

    let mut addresses: Vec<Address> = buffer.iter().map(|(addr, _)| *addr).collect();
    if config.prime_random {
        let mut rng = ChaCha8Rng::seed_from_u64(config.random_seed);
        addresses.shuffle(&mut rng);
    }

    let mut loader = state.start_bulk_load(block);
    for address in addresses {
        let account = buffer.get(&address).expect("address drawn from the buffer being flushed");
        loader.create_account(address);
        loader.set_balance(address, account.balance);
        loader.set_nonce(address, account.nonce);
        loader.set_code(address, account.code.clone());
        for (key, value) in &account.storage {
            loader.set_state(address, *key, *value);
        }
    }
    loader.close()?;
    crate::metrics::PRIMER_METRICS.buffer_flushes.inc();
    Ok(())
}

/// Drives one phase of priming: accumulates `(block, delta, deleted_accounts)`
/// triples into a buffer, flushing it via bulk-load whenever adding the next
/// delta would exceed `UpdateBufferSize` bytes or `PrimeThreshold` accounts
/// (§4.6 phase one/two share this logic). Every account named in any
/// flushed-but-not-yet-destroyed delta's `deleted_accounts` is self-destructed
/// on the live DB right after the flush that finally writes it out — skipped
/// for the very first flush of the whole run, since nothing has been primed
/// yet for those accounts to meaningfully destroy.
fn prime_deltas<S: StateDb>(
    state: &mut S,
    config: &PrimerConfig,
    primed_before: &mut bool,
    deltas: impl Iterator<Item = (u64, WorldState, Vec<Address>)>,
) -> Result<u64, PrimeError> {
    let mut buffer = WorldState::new();
    let mut pending_delete: Vec<Address> = Vec::new();
    let mut last_block = 0u64;

    for (block, delta, deleted) in deltas {
        let projected = approx_size_bytes(&buffer, pending_delete.len()) + approx_size_bytes(&delta, deleted.len());
        if !buffer.is_empty() && (projected > config.update_buffer_size || buffer.len() >= config.prime_threshold) {
            flush_buffer(state, &buffer, config, last_block)?;
            if *primed_before {
                for address in &pending_delete {
                    state.self_destruct(*address);
                }
            }
            *primed_before = true;
            buffer = WorldState::new();
            pending_delete.clear();
        }

        buffer.clear_storage_of(&deleted);
        buffer.merge_from(&delta);
        pending_delete.extend(deleted);
        last_block = block;
    }

    if !buffer.is_empty() {
        flush_buffer(state, &buffer, config, last_block)?;
        if *primed_before {
            for address in &pending_delete {
                state.self_destruct(*address);
            }
        }
        *primed_before = true;
    }

    Ok(last_block)
}

/// Brings `state` from `start` up to (but not including) `target`, per
/// §4.6's three phases.
pub fn prime<S: StateDb>(state: &mut S, aux_db: &dyn AuxDb, config: &PrimerConfig, start: u64, target: u64) -> Result<(), PrimeError> {
    if target < start {
        return Err(PrimeError::InvertedRange { start, target });
    }
    if target == start {
        return Ok(());
    }

    let mut primed_before = false;
    let mut current = start;

    let update_sets = aux_db.update_sets(start, target);
    if !update_sets.is_empty() {
        let deltas = update_sets.into_iter().map(|set| {
            current = set.block + 1;
            (set.block, set.state, set.deleted_accounts)
        });
        prime_deltas(state, config, &mut primed_before, deltas)?;
    }

    if current < target {
        let destroyed = aux_db.destroyed_accounts_in_range(current, target.saturating_sub(1));
        let resurrected = aux_db.resurrected_accounts_in_range(current, target.saturating_sub(1));
        let substates = aux_db.substates(current, target);
        let deltas = substates.into_iter().map(|substate| {
            let deleted = if substate.block + 1 == target || substate.tx == 0 {
                destroyed.iter().copied().filter(|a| !resurrected.contains(a)).collect()
            } else {
                Vec::new()
            };
            (substate.block, substate.data.output_state, deleted)
        });
        prime_deltas(state, config, &mut primed_before, deltas)?;
    }

    let destroyed_before_target = aux_db.destroyed_accounts_in_range(0, target.saturating_sub(1));
    if !destroyed_before_target.is_empty() {
        state.begin_sync_period(0);
        state.begin_block(target.saturating_sub(1))?;
        state.begin_transaction(PSEUDO_TX)?;
        for address in destroyed_before_target {
            state.self_destruct(address);
        }
        state.end_transaction()?;
        state.end_block()?;
        state.end_sync_period();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aida_aux_db::InMemoryAuxDb;
    use aida_memdb::MemStateDb;
    use aida_types::Account;
    use alloy::primitives::{U256, address};

    fn update_set(block: u64, accounts: Vec<(Address, Account)>, deleted: Vec<Address>) -> aida_aux_db::UpdateSet {
        let mut state = WorldState::new();
        for (addr, acc) in accounts {
            state.insert(addr, acc);
        }
        aida_aux_db::UpdateSet { block, state, deleted_accounts: deleted }
    }

    #[test]
    fn phase_one_primes_every_update_set_account() {
        let addr_a = address!("0000000000000000000000000000000000000001");
        let addr_b = address!("0000000000000000000000000000000000000002");
        let mut aux_db = InMemoryAuxDb::new();
        aux_db.put_update_set(update_set(0, vec![(addr_a, Account::new(1, U256::from(10), vec![]))], vec![]));
        aux_db.put_update_set(update_set(1, vec![(addr_b, Account::new(2, U256::from(20), vec![]))], vec![]));

        let mut db = MemStateDb::new();
        let config = PrimerConfig::default();
        prime(&mut db, &aux_db, &config, 0, 2).unwrap();

        assert_eq!(db.get_balance(addr_a), U256::from(10));
        assert_eq!(db.get_balance(addr_b), U256::from(20));
    }

    fn addr_n(n: u8) -> Address {
        let mut bytes = [0u8; 20];
        bytes[19] = n;
        Address::from(bytes)
    }

    #[test]
    fn small_update_buffer_forces_multiple_flushes_but_same_final_state() {
        let addrs: Vec<Address> = (1u8..=6).map(addr_n).collect();
        let mut aux_db_small = InMemoryAuxDb::new();
        let mut aux_db_large = InMemoryAuxDb::new();
        for (block, addr) in addrs.iter().enumerate() {
            let set = update_set(block as u64, vec![(*addr, Account::new(1, U256::from(block as u64 + 1), vec![1, 2, 3]))], vec![]);
            aux_db_small.put_update_set(set.clone());
            aux_db_large.put_update_set(set);
        }

        let mut db_small = MemStateDb::new();
        let small_config = PrimerConfig { update_buffer_size: 1, ..PrimerConfig::default() };
        prime(&mut db_small, &aux_db_small, &small_config, 0, addrs.len() as u64).unwrap();

        let mut db_large = MemStateDb::new();
        let large_config = PrimerConfig::default();
        prime(&mut db_large, &aux_db_large, &large_config, 0, addrs.len() as u64).unwrap();

        for addr in &addrs {
            assert_eq!(db_small.get_balance(*addr), db_large.get_balance(*addr));
        }
    }

    #[test]
    fn randomized_priming_does_not_change_final_balances() {
        let addr_a = address!("0000000000000000000000000000000000000001");
        let addr_b = address!("0000000000000000000000000000000000000002");
        let mut aux_db = InMemoryAuxDb::new();
        aux_db.put_update_set(update_set(
            0,
            vec![
                (addr_a, Account::new(1, U256::from(10), vec![])),
                (addr_b, Account::new(2, U256::from(20), vec![])),
            ],
            vec![],
        ));

        let mut db = MemStateDb::new();
        let config = PrimerConfig { prime_random: true, random_seed: 42, ..PrimerConfig::default() };
        prime(&mut db, &aux_db, &config, 0, 1).unwrap();

        assert_eq!(db.get_balance(addr_a), U256::from(10));
        assert_eq!(db.get_balance(addr_b), U256::from(20));
    }

    #[test]
    fn phase_three_destroys_every_account_destroyed_before_target() {
        let addr = address!("0000000000000000000000000000000000000003");
        let mut aux_db = InMemoryAuxDb::new();
        aux_db.put_update_set(update_set(0, vec![(addr, Account::new(0, U256::from(5), vec![]))], vec![]));
        aux_db.put_destroyed(0, vec![addr]);

        let mut db = MemStateDb::new();
        let config = PrimerConfig::default();
        prime(&mut db, &aux_db, &config, 0, 1).unwrap();

        assert_eq!(db.get_balance(addr), U256::ZERO);
    }
}
