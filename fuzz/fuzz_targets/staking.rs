#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    token::{Client as TokenClient, StellarAssetClient},
    Address, Env,
};
use staking::{ContractError, StakingContract, StakingContractClient};

const STAKER_FUNDS: i128 = 1_000_000_000_000;

#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    Deposit { who: u8, amount: u32 },
    Withdraw { who: u8, amount: u32 },
    Claim { who: u8 },
    SetRate { rate: u16 },
    Advance { ticks: u8 },
}

fuzz_target!(|actions: Vec<FuzzAction>| {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_sequence_number(1);

    let token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let contract_id = env.register(StakingContract, ());
    let client = StakingContractClient::new(&env, &contract_id);

    let owner = Address::generate(&env);
    client.initialize(&owner, &10);
    client.configure_token(&owner, &token, &7);
    StellarAssetClient::new(&env, &token).mint(&contract_id, &STAKER_FUNDS);

    let token_client = TokenClient::new(&env, &token);
    let users: Vec<Address> = (0..5)
        .map(|_| {
            let user = Address::generate(&env);
            StellarAssetClient::new(&env, &token).mint(&user, &STAKER_FUNDS);
            // Unbounded allowance: only the wallet balance limits deposits.
            token_client.approve(&user, &contract_id, &i128::MAX, &200_000);
            user
        })
        .collect();

    let mut staked = vec![0i128; users.len()];
    let mut last_index = 0i128;

    for action in actions.into_iter().take(256) {
        match action {
            FuzzAction::Deposit { who, amount } => {
                let idx = who as usize % users.len();
                let amount = i128::from(amount);
                let funds = token_client.balance(&users[idx]);
                match client.try_deposit(&users[idx], &amount) {
                    Ok(Ok(())) => {
                        assert!(amount > 0 && amount <= funds);
                        staked[idx] += amount;
                    }
                    Err(Ok(ContractError::InvalidAmount)) => assert_eq!(amount, 0),
                    Err(Ok(ContractError::TransferFailed)) => assert!(amount > funds),
                    other => panic!("unexpected deposit outcome: {:?}", other),
                }
            }
            FuzzAction::Withdraw { who, amount } => {
                let idx = who as usize % users.len();
                let amount = i128::from(amount);
                match client.try_withdraw(&users[idx], &amount) {
                    Ok(Ok(())) => {
                        assert!(amount > 0 && amount <= staked[idx]);
                        staked[idx] -= amount;
                    }
                    Err(Ok(ContractError::InvalidAmount)) => assert_eq!(amount, 0),
                    Err(Ok(ContractError::InsufficientStake)) => assert!(amount > staked[idx]),
                    other => panic!("unexpected withdraw outcome: {:?}", other),
                }
            }
            FuzzAction::Claim { who } => {
                let user = &users[who as usize % users.len()];
                let pending = client.pending_rewards(user);
                match client.try_claim(user) {
                    Ok(Ok(paid)) => assert_eq!(paid, pending),
                    Err(Ok(ContractError::NothingToClaim)) => assert_eq!(pending, 0),
                    other => panic!("unexpected claim outcome: {:?}", other),
                }
            }
            FuzzAction::SetRate { rate } => {
                client.set_reward_rate(&owner, &i128::from(rate));
            }
            FuzzAction::Advance { ticks } => {
                let now = env.ledger().sequence();
                env.ledger().set_sequence_number(now + u32::from(ticks));
            }
        }

        for (user, expected) in users.iter().zip(&staked) {
            assert_eq!(client.get_staked(user), *expected);
        }
        assert_eq!(staked.iter().sum::<i128>(), client.get_total_staked());

        let index = client.get_acc_reward_per_share();
        assert!(index >= last_index);
        last_index = index;
    }
});
