use ledger::{Address, Identity, LedgerClient};
use serde::Serialize;
use tracing::info;

use crate::error::Result;

/// Parameters for provisioning a fungible token.
#[derive(Debug, Clone)]
pub struct TokenProvisionParams {
    pub decimals: u8,
    /// Supply minted into the authority's account, in base units.
    pub initial_supply: u64,
    /// Optional recipient for an initial transfer.
    pub recipient: Option<Address>,
    pub recipient_amount: u64,
}

impl Default for TokenProvisionParams {
    fn default() -> Self {
        Self {
            decimals: 9,
            initial_supply: 100_000_000_000,
            recipient: None,
            recipient_amount: 10_000_000_000,
        }
    }
}

/// Addresses produced by a fungible provisioning run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenProvision {
    pub mint: Address,
    pub token_account: Address,
    pub recipient_account: Option<Address>,
}

/// Provision a fungible token: create the mint, ensure the authority's
/// token account, mint the initial supply, revoke the mint authority,
/// then optionally transfer a slice to a recipient.
///
/// Each step is a separate submission; a failure surfaces as an error
/// with the earlier steps left in place (no rollback is possible).
pub async fn provision_token(
    ledger: &dyn LedgerClient,
    authority: &Identity,
    params: TokenProvisionParams,
) -> Result<TokenProvision> {
    let mint = ledger.create_token_mint(authority, params.decimals).await?;
    info!("Token created: {}", mint);

    let token_account = ledger
        .ensure_token_account(authority, &mint, authority.address())
        .await?;
    info!("Token account created: {}", token_account);

    ledger
        .mint_tokens(authority, &mint, &token_account, params.initial_supply)
        .await?;
    info!("Minted {} base units to {}", params.initial_supply, token_account);

    ledger.revoke_mint_authority(authority, &mint).await?;
    info!("Minting authority removed for {}", mint);

    let recipient_account = match params.recipient {
        Some(recipient) => {
            let account = ledger
                .ensure_token_account(authority, &mint, &recipient)
                .await?;
            ledger
                .transfer_tokens(authority, &token_account, &account, params.recipient_amount)
                .await?;
            info!(
                "Transferred {} base units to {}",
                params.recipient_amount, recipient
            );
            Some(account)
        }
        None => None,
    };

    Ok(TokenProvision {
        mint,
        token_account,
        recipient_account,
    })
}
