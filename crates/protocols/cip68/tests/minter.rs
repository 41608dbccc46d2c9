//! End-to-end operation flows against a mock provider and stub wallet

use std::collections::BTreeMap;
use std::sync::Mutex;

use cardano_provider::{ChainProvider, Wallet};
use cardano_tx::{
    asset_name_hex, cip68_100, cip68_222, unit, Asset, TxInRef, TxPlan, Utxo, UtxoOutput,
};
use cip68::{burn_redeemer, Cip68Minter, MintAsset, ReferenceDatum};
use forge_core::{
    constants, Address, Error, ForgeConfig, KeyHash, Network, ProtocolError, ProviderConfig,
    ProviderError, TxId, WalletConfig,
};

const POLICY_ID: &str = "f0ff48bbb7bbe9d59a40f1ce90e9e9d0ff5002ec48f232b49ca0fb9a";
const ASSET_NAME: &str = "Aiken Course 2024";

struct MockProvider {
    utxos: Vec<Utxo>,
    confirmed: Mutex<Vec<TxId>>,
}

impl MockProvider {
    fn new(utxos: Vec<Utxo>) -> Self {
        Self {
            utxos,
            confirmed: Mutex::new(Vec::new()),
        }
    }
}

impl ChainProvider for MockProvider {
    async fn address_utxos(
        &self,
        address: &Address,
        asset: Option<&str>,
    ) -> Result<Vec<Utxo>, ProviderError> {
        Ok(self
            .utxos
            .iter()
            .filter(|u| u.output.address == *address)
            .filter(|u| asset.map_or(true, |unit| u.quantity_of(unit) > 0))
            .cloned()
            .collect())
    }

    async fn submit_tx(&self, _signed_tx: &str) -> Result<TxId, ProviderError> {
        Ok(TxId::new("ee".repeat(32)))
    }

    async fn await_tx_confirmed(&self, tx_id: &TxId) -> Result<(), ProviderError> {
        self.confirmed.lock().unwrap().push(tx_id.clone());
        Ok(())
    }
}

struct StubWallet {
    address: Address,
    key_hash: KeyHash,
    utxos: Vec<Utxo>,
    collateral: Utxo,
}

impl Wallet for StubWallet {
    fn change_address(&self) -> Address {
        self.address.clone()
    }

    fn payment_key_hash(&self) -> Result<KeyHash, Error> {
        Ok(self.key_hash.clone())
    }

    async fn utxos(&self) -> Result<Vec<Utxo>, Error> {
        Ok(self.utxos.clone())
    }

    async fn collateral(&self) -> Result<Utxo, Error> {
        Ok(self.collateral.clone())
    }

    async fn sign_tx(&self, unsigned_tx: &str) -> Result<String, Error> {
        // Stand-in witness; the mock provider accepts anything
        Ok(hex::encode(unsigned_tx))
    }

    async fn submit_tx(&self, signed_tx: &str) -> Result<TxId, Error> {
        let _ = signed_tx;
        Ok(TxId::new("ee".repeat(32)))
    }
}

fn author_hash() -> KeyHash {
    KeyHash::new("ab".repeat(28))
}

fn wallet_address() -> Address {
    Address::new("addr_test1qwallet")
}

fn store_address() -> Address {
    Address::new("addr_test1wqstore")
}

fn test_config() -> ForgeConfig {
    ForgeConfig {
        network: Network::Preview,
        provider: ProviderConfig::default(),
        wallet: WalletConfig::default(),
        policy_id: POLICY_ID.to_string(),
        mint_script: "590a1b0100".to_string(),
        spend_script: "590b2c0200".to_string(),
        store_address: store_address(),
        platform_address: Address::new("addr_test1qplatform"),
        platform_fee: 1_000_000,
    }
}

fn lovelace_utxo(index: u32, quantity: i64) -> Utxo {
    Utxo {
        input: TxInRef::new("aa".repeat(32), index),
        output: UtxoOutput {
            address: wallet_address(),
            amount: vec![Asset::new(constants::LOVELACE_UNIT, quantity)],
            plutus_data: None,
        },
    }
}

fn user_token_utxo(index: u32, quantity: i64) -> Utxo {
    Utxo {
        input: TxInRef::new("cc".repeat(32), index),
        output: UtxoOutput {
            address: wallet_address(),
            amount: vec![
                Asset::new(constants::LOVELACE_UNIT, 1_500_000),
                Asset::new(user_unit(), quantity),
            ],
            plutus_data: None,
        },
    }
}

fn reference_utxo(author: &KeyHash) -> Utxo {
    Utxo {
        input: TxInRef::new("bb".repeat(32), 0),
        output: UtxoOutput {
            address: store_address(),
            amount: vec![
                Asset::new(constants::LOVELACE_UNIT, 1_378_580),
                Asset::new(ref_unit(), 1),
            ],
            plutus_data: Some(ReferenceDatum::new(sample_metadata(author)).to_plutus_data()),
        },
    }
}

fn sample_metadata(author: &KeyHash) -> BTreeMap<String, String> {
    BTreeMap::from([
        ("name".to_string(), ASSET_NAME.to_string()),
        ("image".to_string(), "ipfs://image.png".to_string()),
        ("description".to_string(), "This is a simple example of CIP-68".to_string()),
        ("mediaType".to_string(), "image/png".to_string()),
        ("author".to_string(), author.to_string()),
    ])
}

fn user_unit() -> String {
    unit(POLICY_ID, &cip68_222(&asset_name_hex(ASSET_NAME)))
}

fn ref_unit() -> String {
    unit(POLICY_ID, &cip68_100(&asset_name_hex(ASSET_NAME)))
}

fn stub_wallet() -> StubWallet {
    StubWallet {
        address: wallet_address(),
        key_hash: author_hash(),
        utxos: vec![lovelace_utxo(0, 100_000_000)],
        collateral: lovelace_utxo(1, 5_000_000),
    }
}

fn minter(provider: MockProvider) -> Cip68Minter<MockProvider, StubWallet> {
    Cip68Minter::new(test_config(), provider, stub_wallet())
}

fn parse(unsigned_tx: &str) -> TxPlan {
    serde_json::from_str(unsigned_tx).expect("unsigned tx should be a TxPlan")
}

#[tokio::test]
async fn mint_creates_token_pair_for_new_asset() {
    let minter = minter(MockProvider::new(vec![]));

    let unsigned = minter
        .mint(MintAsset {
            asset_name: ASSET_NAME.to_string(),
            metadata: sample_metadata(&author_hash()),
            quantity: 1,
            receiver: None,
        })
        .await
        .unwrap();

    let plan = parse(&unsigned);
    let minted = plan.minted_units();
    assert_eq!(minted[&user_unit()], 1);
    assert_eq!(minted[&ref_unit()], 1);

    let ref_out = plan
        .outputs
        .iter()
        .find(|o| o.quantity_of(&ref_unit()) == 1)
        .unwrap();
    assert_eq!(ref_out.address, store_address());
    assert!(ref_out.inline_datum.is_some());

    // Build, sign, submit, then wait for confirmation, strictly ordered
    let tx_id = minter.submit_and_confirm(&unsigned).await.unwrap();
    assert_eq!(tx_id, TxId::new("ee".repeat(32)));
    assert_eq!(
        minter.provider().confirmed.lock().unwrap().as_slice(),
        &[tx_id]
    );
}

#[tokio::test]
async fn mint_extends_supply_when_reference_exists() {
    let minter = minter(MockProvider::new(vec![reference_utxo(&author_hash())]));

    let unsigned = minter
        .mint(MintAsset {
            asset_name: ASSET_NAME.to_string(),
            metadata: sample_metadata(&author_hash()),
            quantity: 4,
            receiver: None,
        })
        .await
        .unwrap();

    let plan = parse(&unsigned);
    let minted = plan.minted_units();
    assert_eq!(minted.len(), 1);
    assert_eq!(minted[&user_unit()], 4);
    assert!(plan.outputs.iter().all(|o| o.inline_datum.is_none()));
}

#[tokio::test]
async fn mint_fails_for_foreign_author() {
    let foreign = KeyHash::new("99".repeat(28));
    let minter = minter(MockProvider::new(vec![reference_utxo(&foreign)]));

    let err = minter
        .mint(MintAsset {
            asset_name: ASSET_NAME.to_string(),
            metadata: sample_metadata(&author_hash()),
            quantity: 1,
            receiver: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Protocol(ProtocolError::NotAssetAuthor { .. })
    ));
}

#[tokio::test]
async fn full_burn_spends_reference_and_burns_pair() {
    let minter = minter(MockProvider::new(vec![
        reference_utxo(&author_hash()),
        user_token_utxo(0, 2),
        user_token_utxo(1, 3),
    ]));

    let unsigned = minter.burn(ASSET_NAME, -5).await.unwrap();
    let plan = parse(&unsigned);

    let minted = plan.minted_units();
    assert_eq!(minted[&user_unit()], -5);
    assert_eq!(minted[&ref_unit()], -1);

    assert_eq!(plan.script_inputs.len(), 1);
    assert_eq!(plan.script_inputs[0].redeemer, burn_redeemer());
}

#[tokio::test]
async fn partial_burn_emits_change_and_keeps_reference() {
    let reference = reference_utxo(&author_hash());
    let minter = minter(MockProvider::new(vec![
        reference.clone(),
        user_token_utxo(0, 2),
        user_token_utxo(1, 3),
    ]));

    let unsigned = minter.burn(ASSET_NAME, -2).await.unwrap();
    let plan = parse(&unsigned);

    assert_eq!(plan.minted_units()[&user_unit()], -2);
    assert!(!plan.spends(&reference.input));

    let change = plan
        .outputs
        .iter()
        .find(|o| o.quantity_of(&user_unit()) > 0)
        .unwrap();
    assert_eq!(change.quantity_of(&user_unit()), 3);
    assert_eq!(change.address, wallet_address());
}

#[tokio::test]
async fn burn_fails_without_reference() {
    let minter = minter(MockProvider::new(vec![user_token_utxo(0, 2)]));

    let err = minter.burn(ASSET_NAME, -2).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Protocol(ProtocolError::ReferenceNotFound { .. })
    ));
}

#[tokio::test]
async fn update_replaces_reference_datum() {
    let reference = reference_utxo(&author_hash());
    let minter = minter(MockProvider::new(vec![reference.clone()]));

    let mut metadata = sample_metadata(&author_hash());
    metadata.insert("image".to_string(), "ipfs://image-v2.png".to_string());

    let unsigned = minter.update(ASSET_NAME, metadata.clone()).await.unwrap();
    let plan = parse(&unsigned);

    assert!(plan.spends(&reference.input));
    let ref_out = plan
        .outputs
        .iter()
        .find(|o| o.quantity_of(&ref_unit()) == 1)
        .unwrap();
    let datum = ReferenceDatum::from_plutus_data(ref_out.inline_datum.as_ref().unwrap()).unwrap();
    assert_eq!(datum.metadata, metadata);
}

#[tokio::test]
async fn update_fails_without_reference() {
    let minter = minter(MockProvider::new(vec![]));

    let err = minter
        .update(ASSET_NAME, sample_metadata(&author_hash()))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Protocol(ProtocolError::ReferenceNotFound { .. })
    ));
}

#[tokio::test]
async fn every_operation_carries_the_platform_fee() {
    let config = test_config();
    let minter = minter(MockProvider::new(vec![
        reference_utxo(&author_hash()),
        user_token_utxo(0, 5),
    ]));

    let mint_tx = minter
        .mint(MintAsset {
            asset_name: ASSET_NAME.to_string(),
            metadata: sample_metadata(&author_hash()),
            quantity: 2,
            receiver: None,
        })
        .await
        .unwrap();
    let burn_tx = minter.burn(ASSET_NAME, -1).await.unwrap();
    let update_tx = minter
        .update(ASSET_NAME, sample_metadata(&author_hash()))
        .await
        .unwrap();

    for unsigned in [mint_tx, burn_tx, update_tx] {
        let plan = parse(&unsigned);
        let fee: i64 = plan
            .outputs
            .iter()
            .filter(|o| o.address == config.platform_address)
            .map(|o| o.quantity_of(constants::LOVELACE_UNIT))
            .sum();
        assert_eq!(fee, config.platform_fee);
    }
}
