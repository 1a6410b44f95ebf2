use std::sync::Arc;
use std::thread;

use k256::ecdsa::SigningKey;
use merkle_distributor::signature::{claimer_address, sign_claim};
use merkle_distributor::{
    ClaimDomain, ClaimError, ClaimRequest, DistributorConfig, InMemoryToken, MerkleDistributor,
    TokenTransfer,
};
use merkle_tree::{Address, AirdropMerkleTree, TreeNode};
use primitive_types::U256;

fn test_domain() -> ClaimDomain {
    ClaimDomain::new("MerkleDistributor", "1", 1, [0xd0; 20])
}

fn test_key(seed: u8) -> SigningKey {
    SigningKey::from_slice(&[seed; 32]).unwrap()
}

/// Four deterministic claimants, 25 tokens each.
fn build_fixture() -> (AirdropMerkleTree, Vec<SigningKey>) {
    let keys: Vec<SigningKey> = (1..=4).map(test_key).collect();
    let nodes: Vec<TreeNode> = keys
        .iter()
        .map(|key| TreeNode::new(claimer_address(key.verifying_key()), U256::from(25u64)))
        .collect();
    let tree = AirdropMerkleTree::new(nodes).unwrap();
    (tree, keys)
}

fn build_distributor(
    tree: &AirdropMerkleTree,
    treasury: u64,
) -> MerkleDistributor<Arc<InMemoryToken>> {
    let token = Arc::new(InMemoryToken::new(U256::from(treasury)));
    let config = DistributorConfig::from_tree(tree, test_domain());
    MerkleDistributor::new(config, token)
}

fn valid_request(tree: &AirdropMerkleTree, key: &SigningKey) -> ClaimRequest {
    let claimant = claimer_address(key.verifying_key());
    let node = tree.get_node(&claimant).unwrap();
    let signature = sign_claim(key, &test_domain(), &claimant, node.amount).unwrap();
    ClaimRequest {
        claimant,
        amount: node.amount,
        proof: node.proof.clone(),
        signature: signature.to_vec(),
    }
}

#[test]
fn claim_scenario_end_to_end() {
    let (tree, keys) = build_fixture();
    let distributor = build_distributor(&tree, 100);
    let claimant = claimer_address(keys[0].verifying_key());

    let request = valid_request(&tree, &keys[0]);
    let event = distributor.claim(&request).unwrap();
    assert_eq!(event.claimant, claimant);
    assert_eq!(event.amount, U256::from(25u64));
    assert_eq!(distributor.token().balance_of(&claimant), U256::from(25u64));
    assert!(distributor.is_claimed(&claimant));
    assert_eq!(distributor.num_nodes_claimed(), 1);
    assert_eq!(distributor.total_amount_claimed(), U256::from(25u64));

    // identical resubmission
    assert_eq!(distributor.claim(&request), Err(ClaimError::AlreadyClaimed));
    assert_eq!(distributor.token().balance_of(&claimant), U256::from(25u64));

    // altered amount with the original proof, signature re-made for the
    // altered pair so the proof is the check that fails
    let other = claimer_address(keys[1].verifying_key());
    let mut altered = valid_request(&tree, &keys[1]);
    altered.amount = U256::from(30u64);
    altered.signature = sign_claim(&keys[1], &test_domain(), &other, altered.amount)
        .unwrap()
        .to_vec();
    assert_eq!(distributor.claim(&altered), Err(ClaimError::InvalidProof));
    assert!(!distributor.is_claimed(&other));
}

#[test]
fn all_grants_claimable_exactly_once() {
    let (tree, keys) = build_fixture();
    let distributor = build_distributor(&tree, 100);

    for key in &keys {
        distributor.claim(&valid_request(&tree, key)).unwrap();
    }
    assert_eq!(distributor.num_nodes_claimed(), 4);
    assert_eq!(distributor.total_amount_claimed(), U256::from(100u64));
    assert_eq!(distributor.token().treasury(), U256::zero());

    for key in &keys {
        assert_eq!(
            distributor.claim(&valid_request(&tree, key)),
            Err(ClaimError::AlreadyClaimed)
        );
    }
}

#[test]
fn tampered_proof_rejected() {
    let (tree, keys) = build_fixture();
    let distributor = build_distributor(&tree, 100);

    let mut request = valid_request(&tree, &keys[2]);
    request.proof[0][5] ^= 0x01;
    assert_eq!(distributor.claim(&request), Err(ClaimError::InvalidProof));
    assert!(!distributor.is_claimed(&request.claimant));
    assert_eq!(distributor.num_nodes_claimed(), 0);
}

#[test]
fn tampered_claimant_rejected() {
    let (tree, keys) = build_fixture();
    let distributor = build_distributor(&tree, 100);

    // a flipped address byte changes the recomputed leaf, so the proof
    // no longer folds to the root
    let mut request = valid_request(&tree, &keys[1]);
    request.claimant[3] ^= 0x01;
    assert_eq!(distributor.claim(&request), Err(ClaimError::InvalidProof));
}

#[test]
fn proof_sequence_order_is_significant() {
    let (tree, keys) = build_fixture();
    let distributor = build_distributor(&tree, 100);

    let mut request = valid_request(&tree, &keys[0]);
    assert_eq!(request.proof.len(), 2);
    request.proof.reverse();
    assert_eq!(distributor.claim(&request), Err(ClaimError::InvalidProof));
}

#[test]
fn foreign_signature_rejected() {
    let (tree, keys) = build_fixture();
    let distributor = build_distributor(&tree, 100);

    // signature produced by a different key over the same pair
    let mut request = valid_request(&tree, &keys[0]);
    request.signature = sign_claim(
        &keys[1],
        &test_domain(),
        &request.claimant,
        request.amount,
    )
    .unwrap()
    .to_vec();
    assert_eq!(
        distributor.claim(&request),
        Err(ClaimError::InvalidSignature)
    );

    // corrupted signature bytes
    let mut request = valid_request(&tree, &keys[0]);
    request.signature[10] ^= 0xff;
    assert_eq!(
        distributor.claim(&request),
        Err(ClaimError::InvalidSignature)
    );
}

#[test]
fn signature_from_other_domain_rejected() {
    let (tree, keys) = build_fixture();
    let distributor = build_distributor(&tree, 100);

    let mut other_chain = test_domain();
    other_chain.chain_id = 5;
    let mut request = valid_request(&tree, &keys[0]);
    request.signature = sign_claim(&keys[0], &other_chain, &request.claimant, request.amount)
        .unwrap()
        .to_vec();
    assert_eq!(
        distributor.claim(&request),
        Err(ClaimError::InvalidSignature)
    );
}

#[test]
fn cross_tree_proof_rejected() {
    let (tree_a, keys) = build_fixture();
    let other_nodes: Vec<TreeNode> = (10..=13)
        .map(|seed| {
            TreeNode::new(
                claimer_address(test_key(seed).verifying_key()),
                U256::from(25u64),
            )
        })
        .collect();
    let tree_b = AirdropMerkleTree::new(other_nodes).unwrap();

    let distributor = build_distributor(&tree_b, 100);
    let request = valid_request(&tree_a, &keys[0]);
    assert_eq!(distributor.claim(&request), Err(ClaimError::InvalidProof));
}

#[test]
fn malformed_requests_rejected() {
    let (tree, keys) = build_fixture();
    let distributor = build_distributor(&tree, 100);

    let mut zero = valid_request(&tree, &keys[0]);
    zero.claimant = [0u8; 20];
    assert!(matches!(
        distributor.claim(&zero),
        Err(ClaimError::MalformedInput("zero claimant address"))
    ));

    let mut empty_proof = valid_request(&tree, &keys[0]);
    empty_proof.proof.clear();
    assert!(matches!(
        distributor.claim(&empty_proof),
        Err(ClaimError::MalformedInput("empty proof for non-singleton tree"))
    ));

    let mut overlong = valid_request(&tree, &keys[0]);
    overlong.proof = vec![[0u8; 32]; 33];
    assert!(matches!(
        distributor.claim(&overlong),
        Err(ClaimError::MalformedInput("proof exceeds maximum depth"))
    ));

    let mut short_sig = valid_request(&tree, &keys[0]);
    short_sig.signature.truncate(64);
    assert!(matches!(
        distributor.claim(&short_sig),
        Err(ClaimError::MalformedInput("signature must be 65 bytes"))
    ));

    // none of the rejections touched state
    assert_eq!(distributor.num_nodes_claimed(), 0);
}

#[test]
fn singleton_tree_accepts_empty_proof() {
    let key = test_key(7);
    let claimant = claimer_address(key.verifying_key());
    let tree =
        AirdropMerkleTree::new(vec![TreeNode::new(claimant, U256::from(50u64))]).unwrap();
    assert_eq!(tree.merkle_root, tree.tree_nodes[0].hash());

    let distributor = build_distributor(&tree, 50);
    let request = valid_request(&tree, &key);
    assert!(request.proof.is_empty());
    distributor.claim(&request).unwrap();
    assert_eq!(distributor.token().balance_of(&claimant), U256::from(50u64));
}

#[test]
fn distribution_caps_enforced() {
    let (tree, keys) = build_fixture();

    let mut config = DistributorConfig::from_tree(&tree, test_domain());
    config.max_num_nodes = 1;
    let distributor =
        MerkleDistributor::new(config, Arc::new(InMemoryToken::new(U256::from(100u64))));
    distributor.claim(&valid_request(&tree, &keys[0])).unwrap();
    assert_eq!(
        distributor.claim(&valid_request(&tree, &keys[1])),
        Err(ClaimError::MaxNodesExceeded)
    );

    let mut config = DistributorConfig::from_tree(&tree, test_domain());
    config.max_total_claim = U256::from(25u64);
    let distributor =
        MerkleDistributor::new(config, Arc::new(InMemoryToken::new(U256::from(100u64))));
    distributor.claim(&valid_request(&tree, &keys[0])).unwrap();
    assert_eq!(
        distributor.claim(&valid_request(&tree, &keys[1])),
        Err(ClaimError::ExceededMaxClaim)
    );
}

struct FailingToken;

impl TokenTransfer for FailingToken {
    fn transfer(&self, _to: Address, _amount: U256) -> bool {
        false
    }
}

#[test]
fn failed_transfer_rolls_back_the_mark() {
    let (tree, keys) = build_fixture();
    let config = DistributorConfig::from_tree(&tree, test_domain());
    let distributor = MerkleDistributor::new(config, FailingToken);

    let request = valid_request(&tree, &keys[0]);
    assert_eq!(distributor.claim(&request), Err(ClaimError::TransferFailed));
    assert!(!distributor.is_claimed(&request.claimant));
    assert_eq!(distributor.num_nodes_claimed(), 0);
    assert_eq!(distributor.total_amount_claimed(), U256::zero());

    // the failure is repeatable, not sticky
    assert_eq!(distributor.claim(&request), Err(ClaimError::TransferFailed));
}

#[test]
fn concurrent_same_address_claims_succeed_once() {
    let (tree, keys) = build_fixture();
    let distributor = Arc::new(build_distributor(&tree, 100));
    let request = valid_request(&tree, &keys[0]);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let distributor = Arc::clone(&distributor);
            let request = request.clone();
            thread::spawn(move || distributor.claim(&request))
        })
        .collect();

    let mut successes = 0;
    for handle in handles {
        match handle.join().unwrap() {
            Ok(_) => successes += 1,
            Err(e) => assert_eq!(e, ClaimError::AlreadyClaimed),
        }
    }
    assert_eq!(successes, 1);
    assert_eq!(distributor.num_nodes_claimed(), 1);
    assert_eq!(
        distributor.token().balance_of(&request.claimant),
        U256::from(25u64)
    );
}
