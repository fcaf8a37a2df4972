//! Recognizers for the two standard output templates this workspace
//! supports: P2PKH and P2SH.

use crate::command::Command;
use crate::opcode::{OP_CHECKSIG, OP_DUP, OP_EQUAL, OP_EQUALVERIFY, OP_HASH160};
use crate::script::Script;

/// `OP_DUP OP_HASH160 <20B> OP_EQUALVERIFY OP_CHECKSIG`.
pub fn is_p2pkh(script: &Script) -> bool {
    matches!(
        script.commands.as_slice(),
        [
            Command::Op(op1),
            Command::Op(op2),
            Command::Element(hash),
            Command::Op(op3),
            Command::Op(op4),
        ] if *op1 == OP_DUP
            && *op2 == OP_HASH160
            && hash.len() == 20
            && *op3 == OP_EQUALVERIFY
            && *op4 == OP_CHECKSIG
    )
}

/// `OP_HASH160 <20B> OP_EQUAL`.
pub fn is_p2sh(script: &Script) -> bool {
    matches!(
        script.commands.as_slice(),
        [Command::Op(op1), Command::Element(hash), Command::Op(op2)]
            if *op1 == OP_HASH160 && hash.len() == 20 && *op2 == OP_EQUAL
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_p2pkh() {
        let script = Script::new(vec![
            Command::Op(OP_DUP),
            Command::Op(OP_HASH160),
            Command::Element(vec![0u8; 20]),
            Command::Op(OP_EQUALVERIFY),
            Command::Op(OP_CHECKSIG),
        ]);
        assert!(is_p2pkh(&script));
        assert!(!is_p2sh(&script));
    }

    #[test]
    fn recognizes_p2sh() {
        let script = Script::new(vec![
            Command::Op(OP_HASH160),
            Command::Element(vec![0u8; 20]),
            Command::Op(OP_EQUAL),
        ]);
        assert!(is_p2sh(&script));
        assert!(!is_p2pkh(&script));
    }

    #[test]
    fn rejects_scripts_that_merely_resemble_the_pattern() {
        let script = Script::new(vec![Command::Op(OP_HASH160), Command::Element(vec![0u8; 19]), Command::Op(OP_EQUAL)]);
        assert!(!is_p2sh(&script));
    }
}
