use aida_statedb::StateDb;
use aida_types::WorldState;

/// Overwrites `state` with `patch`: creates missing accounts, sets
/// balance/nonce/code where they differ, and writes every listed storage
/// slot (§4.5). Returns whether any storage slot was written, since the
/// caller must restart the enclosing transaction scope when that happens
/// mid-transaction so refund accounting is not distorted.
pub fn overwrite(state: &mut impl StateDb, patch: &WorldState) -> bool {
    let mut wrote_storage = false;
    for (address, account) in patch.iter() {
        if !state.exist(*address) {
            state.create_account(*address);
        }
        if state.get_balance(*address) != account.balance {
            let current = state.get_balance(*address);
            if account.balance >= current {
                state.add_balance(*address, account.balance - current);
            } else {
                state.sub_balance(*address, current - account.balance);
            }
        }
        if state.get_nonce(*address) != account.nonce {
            state.set_nonce(*address, account.nonce);
        }
        if state.get_code(*address) != account.code {
            state.set_code(*address, account.code.clone());
        }
        for (key, value) in &account.storage {
            state.set_state(*address, *key, *value);
            wrote_storage = true;
        }
    }
    wrote_storage
}
