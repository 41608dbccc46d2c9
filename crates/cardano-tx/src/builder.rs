//! Fluent unsigned-transaction builder
//!
//! A narrow facade over [`TxPlan`] mirroring the capability set of the
//! external assembly SDK: declare mints, outputs, and script spends, then
//! `complete()` into the serialized blueprint. Mis-sequenced calls are
//! recorded and surfaced by `complete()` so chains stay infallible.

use forge_core::{Address, Network, TxError};

use crate::plan::{
    Asset, MintItem, PlutusVersion, ScriptInput, TxInRef, TxOutput, TxPlan, Utxo,
};
use crate::plutus::PlutusData;

#[derive(Debug)]
struct PendingMint {
    policy_id: String,
    asset_name: String,
    quantity: String,
    script_version: PlutusVersion,
    script: Option<String>,
    redeemer: Option<PlutusData>,
}

#[derive(Debug)]
struct PendingScriptInput {
    tx_hash: String,
    output_index: u32,
    script_version: PlutusVersion,
    script: Option<String>,
    redeemer: Option<PlutusData>,
    inline_datum_present: bool,
}

/// Fluent builder for a [`TxPlan`]
#[derive(Debug, Default)]
pub struct TxBuilder {
    network: Option<Network>,
    inputs: Vec<Utxo>,
    mints: Vec<PendingMint>,
    script_inputs: Vec<PendingScriptInput>,
    outputs: Vec<TxOutput>,
    change_address: Option<Address>,
    required_signers: Vec<String>,
    collateral: Option<TxInRef>,
    /// Script version declared for the next mint() or tx_in()
    pending_version: Option<PlutusVersion>,
    errors: Vec<String>,
}

impl TxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare that the next mint uses a Plutus V3 minting script
    pub fn mint_plutus_script_v3(mut self) -> Self {
        self.pending_version = Some(PlutusVersion::V3);
        self
    }

    /// Declare a mint (negative quantity = burn) of one asset
    pub fn mint(mut self, quantity: i64, policy_id: &str, asset_name_hex: &str) -> Self {
        match self.pending_version.take() {
            Some(version) => self.mints.push(PendingMint {
                policy_id: policy_id.to_string(),
                asset_name: asset_name_hex.to_string(),
                quantity: quantity.to_string(),
                script_version: version,
                script: None,
                redeemer: None,
            }),
            None => self
                .errors
                .push("mint() requires a preceding mint_plutus_script_vX()".to_string()),
        }
        self
    }

    /// Attach the compiled minting script to the current mint
    pub fn minting_script(mut self, script_cbor: &str) -> Self {
        match self.mints.last_mut() {
            Some(mint) => mint.script = Some(script_cbor.to_string()),
            None => self
                .errors
                .push("minting_script() before any mint()".to_string()),
        }
        self
    }

    /// Attach the redeemer value to the current mint
    pub fn mint_redeemer_value(mut self, redeemer: PlutusData) -> Self {
        match self.mints.last_mut() {
            Some(mint) => mint.redeemer = Some(redeemer),
            None => self
                .errors
                .push("mint_redeemer_value() before any mint()".to_string()),
        }
        self
    }

    /// Declare an output
    pub fn tx_out(mut self, address: &Address, amount: Vec<Asset>) -> Self {
        self.outputs.push(TxOutput {
            address: address.clone(),
            amount,
            inline_datum: None,
        });
        self
    }

    /// Attach an inline datum to the current output
    pub fn tx_out_inline_datum_value(mut self, datum: PlutusData) -> Self {
        match self.outputs.last_mut() {
            Some(output) => output.inline_datum = Some(datum),
            None => self
                .errors
                .push("tx_out_inline_datum_value() before any tx_out()".to_string()),
        }
        self
    }

    /// Declare that the next tx_in() is spent under a Plutus V3 script
    pub fn spending_plutus_script_v3(mut self) -> Self {
        self.pending_version = Some(PlutusVersion::V3);
        self
    }

    /// Declare a script-spent input
    pub fn tx_in(mut self, tx_hash: &str, output_index: u32) -> Self {
        match self.pending_version.take() {
            Some(version) => self.script_inputs.push(PendingScriptInput {
                tx_hash: tx_hash.to_string(),
                output_index,
                script_version: version,
                script: None,
                redeemer: None,
                inline_datum_present: false,
            }),
            None => self
                .errors
                .push("tx_in() requires a preceding spending_plutus_script_vX()".to_string()),
        }
        self
    }

    /// Mark the current script input's datum as inline
    pub fn tx_in_inline_datum_present(mut self) -> Self {
        match self.script_inputs.last_mut() {
            Some(input) => input.inline_datum_present = true,
            None => self
                .errors
                .push("tx_in_inline_datum_present() before any tx_in()".to_string()),
        }
        self
    }

    /// Attach the redeemer value to the current script input
    pub fn tx_in_redeemer_value(mut self, redeemer: PlutusData) -> Self {
        match self.script_inputs.last_mut() {
            Some(input) => input.redeemer = Some(redeemer),
            None => self
                .errors
                .push("tx_in_redeemer_value() before any tx_in()".to_string()),
        }
        self
    }

    /// Attach the compiled spending script to the current script input
    pub fn tx_in_script(mut self, script_cbor: &str) -> Self {
        match self.script_inputs.last_mut() {
            Some(input) => input.script = Some(script_cbor.to_string()),
            None => self.errors.push("tx_in_script() before any tx_in()".to_string()),
        }
        self
    }

    /// Offer wallet UTXOs for funding selection
    pub fn select_utxos_from(mut self, utxos: &[Utxo]) -> Self {
        self.inputs.extend_from_slice(utxos);
        self
    }

    pub fn change_address(mut self, address: &Address) -> Self {
        self.change_address = Some(address.clone());
        self
    }

    pub fn required_signer_hash(mut self, key_hash: &str) -> Self {
        self.required_signers.push(key_hash.to_string());
        self
    }

    pub fn tx_in_collateral(mut self, tx_hash: &str, output_index: u32) -> Self {
        self.collateral = Some(TxInRef::new(tx_hash, output_index));
        self
    }

    pub fn set_network(mut self, network: Network) -> Self {
        self.network = Some(network);
        self
    }

    /// Validate and produce the blueprint
    pub fn complete(self) -> Result<TxPlan, TxError> {
        if let Some(message) = self.errors.into_iter().next() {
            return Err(TxError::BuildFailed { message });
        }

        let network = self.network.ok_or_else(|| TxError::BuildFailed {
            message: "network not set".to_string(),
        })?;

        let change_address = self.change_address.ok_or_else(|| TxError::BuildFailed {
            message: "change address not set".to_string(),
        })?;

        if self.inputs.is_empty() {
            return Err(TxError::NoUtxos);
        }

        let mut mints = Vec::with_capacity(self.mints.len());
        for pending in self.mints {
            mints.push(MintItem {
                script: pending.script.ok_or_else(|| TxError::BuildFailed {
                    message: format!("mint {} missing minting script", pending.asset_name),
                })?,
                redeemer: pending.redeemer.ok_or_else(|| TxError::BuildFailed {
                    message: format!("mint {} missing redeemer", pending.asset_name),
                })?,
                policy_id: pending.policy_id,
                asset_name: pending.asset_name,
                quantity: pending.quantity,
                script_version: pending.script_version,
            });
        }

        let mut script_inputs = Vec::with_capacity(self.script_inputs.len());
        for pending in self.script_inputs {
            script_inputs.push(ScriptInput {
                script: pending.script.ok_or_else(|| TxError::BuildFailed {
                    message: format!("script input {} missing script", pending.tx_hash),
                })?,
                redeemer: pending.redeemer.ok_or_else(|| TxError::BuildFailed {
                    message: format!("script input {} missing redeemer", pending.tx_hash),
                })?,
                tx_hash: pending.tx_hash,
                output_index: pending.output_index,
                script_version: pending.script_version,
                inline_datum_present: pending.inline_datum_present,
            });
        }

        let uses_scripts = !mints.is_empty() || !script_inputs.is_empty();
        if uses_scripts && self.collateral.is_none() {
            return Err(TxError::BuildFailed {
                message: "collateral required for script execution".to_string(),
            });
        }

        Ok(TxPlan {
            network,
            inputs: self.inputs,
            mints,
            script_inputs,
            outputs: self.outputs,
            change_address,
            required_signers: self.required_signers,
            collateral: self.collateral,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::UtxoOutput;

    fn mock_utxo(lovelace: i64) -> Utxo {
        Utxo {
            input: TxInRef::new("aa".repeat(32), 0),
            output: UtxoOutput {
                address: Address::new("addr_test1wallet"),
                amount: vec![Asset::new("lovelace", lovelace)],
                plutus_data: None,
            },
        }
    }

    fn base_builder() -> TxBuilder {
        TxBuilder::new()
            .mint_plutus_script_v3()
            .mint(1, &"bb".repeat(28), "000de140616263")
            .minting_script("490100")
            .mint_redeemer_value(PlutusData::constr(0, vec![]))
            .select_utxos_from(&[mock_utxo(5_000_000)])
            .change_address(&Address::new("addr_test1wallet"))
            .required_signer_hash(&"cc".repeat(28))
            .tx_in_collateral(&"dd".repeat(32), 1)
            .set_network(Network::Preview)
    }

    #[test]
    fn test_complete_mint_plan() {
        let plan = base_builder().complete().unwrap();
        assert_eq!(plan.mints.len(), 1);
        assert_eq!(plan.mints[0].quantity, "1");
        assert_eq!(plan.mints[0].script_version, PlutusVersion::V3);
        assert_eq!(plan.required_signers, vec!["cc".repeat(28)]);
        assert!(plan.collateral.is_some());
    }

    #[test]
    fn test_mint_without_version_declaration() {
        let err = TxBuilder::new()
            .mint(1, "policy", "name")
            .complete()
            .unwrap_err();
        assert!(matches!(err, TxError::BuildFailed { .. }));
    }

    #[test]
    fn test_missing_minting_script() {
        let err = TxBuilder::new()
            .mint_plutus_script_v3()
            .mint(1, "policy", "name")
            .mint_redeemer_value(PlutusData::constr(0, vec![]))
            .select_utxos_from(&[mock_utxo(1_000_000)])
            .change_address(&Address::new("addr_test1wallet"))
            .tx_in_collateral("hash", 0)
            .set_network(Network::Preview)
            .complete()
            .unwrap_err();
        assert!(matches!(err, TxError::BuildFailed { .. }));
    }

    #[test]
    fn test_no_utxos() {
        let err = TxBuilder::new()
            .change_address(&Address::new("addr_test1wallet"))
            .set_network(Network::Preview)
            .complete()
            .unwrap_err();
        assert!(matches!(err, TxError::NoUtxos));
    }

    #[test]
    fn test_collateral_required_for_scripts() {
        let err = TxBuilder::new()
            .mint_plutus_script_v3()
            .mint(1, "policy", "name")
            .minting_script("490100")
            .mint_redeemer_value(PlutusData::constr(0, vec![]))
            .select_utxos_from(&[mock_utxo(1_000_000)])
            .change_address(&Address::new("addr_test1wallet"))
            .set_network(Network::Preview)
            .complete()
            .unwrap_err();
        assert!(matches!(err, TxError::BuildFailed { .. }));
    }

    #[test]
    fn test_inline_datum_attaches_to_last_output() {
        let plan = base_builder()
            .tx_out(&Address::new("addr_test1store"), vec![Asset::new("u", 1)])
            .tx_out_inline_datum_value(PlutusData::int(7))
            .complete()
            .unwrap();
        assert_eq!(plan.outputs.len(), 1);
        assert_eq!(plan.outputs[0].inline_datum, Some(PlutusData::int(7)));
    }

    #[test]
    fn test_script_spend_sequence() {
        let plan = base_builder()
            .spending_plutus_script_v3()
            .tx_in(&"ee".repeat(32), 3)
            .tx_in_inline_datum_present()
            .tx_in_redeemer_value(PlutusData::constr(1, vec![]))
            .tx_in_script("590200")
            .complete()
            .unwrap();
        assert_eq!(plan.script_inputs.len(), 1);
        let spend = &plan.script_inputs[0];
        assert_eq!(spend.output_index, 3);
        assert!(spend.inline_datum_present);
        assert_eq!(spend.redeemer, PlutusData::constr(1, vec![]));
    }
}
