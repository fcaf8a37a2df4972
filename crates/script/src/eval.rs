//! The stack-based evaluator: given a sighash integer `z`, runs a script's
//! commands against a main stack and an alt stack, with BIP16 P2SH
//! recognition spliced in as data elements are pushed.

use std::collections::VecDeque;

use btc_common::hash::{hash160, hash256};
use btc_crypto::ecdsa;
use btc_crypto::sec;
use btc_crypto::signature::Signature;
use num_bigint::BigUint;
use ripemd::Ripemd160;
use sha1::Sha1;
use sha2::{Digest, Sha256};

use crate::command::Command;
use crate::error::Error;
use crate::numbers::{decode_num, encode_num, is_truthy};
use crate::opcode::*;
use crate::script::Script;

/// Runs `script` against sighash `z`. Returns `Ok(true)` if the script
/// completes with a non-empty, non-falsy top stack element.
pub fn evaluate(script: &Script, z: &BigUint) -> Result<bool, Error> {
    let mut cmds: VecDeque<Command> = script.commands.clone().into();
    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut altstack: Vec<Vec<u8>> = Vec::new();

    while let Some(cmd) = cmds.pop_front() {
        match cmd {
            Command::Element(bytes) => {
                stack.push(bytes);
                maybe_splice_p2sh(&mut stack, &mut cmds)?;
            }
            Command::Op(op) => run_op(op, &mut stack, &mut altstack, &mut cmds, z)?,
        }
    }

    match stack.last() {
        Some(top) => Ok(is_truthy(top)),
        None => Ok(false),
    }
}

fn maybe_splice_p2sh(stack: &mut Vec<Vec<u8>>, cmds: &mut VecDeque<Command>) -> Result<(), Error> {
    let tail_is_p2sh = {
        let contiguous = cmds.make_contiguous();
        matches!(
            contiguous,
            [Command::Op(op1), Command::Element(hash), Command::Op(op2)]
                if *op1 == OP_HASH160 && hash.len() == 20 && *op2 == OP_EQUAL
        )
    };
    if !tail_is_p2sh {
        return Ok(());
    }
    cmds.pop_front(); // OP_HASH160
    let Some(Command::Element(expected_hash)) = cmds.pop_front() else {
        return Err(Error::EvaluationFailed("P2SH tail lost its hash element".into()));
    };
    cmds.pop_front(); // OP_EQUAL

    let redeem_script_bytes = stack.last().cloned().ok_or_else(|| {
        Error::EvaluationFailed("P2SH splice with empty stack".into())
    })?;
    if hash160(&redeem_script_bytes).to_vec() != expected_hash {
        return Err(Error::EvaluationFailed("P2SH redeem script hash mismatch".into()));
    }
    stack.pop();

    let mut prefixed = Vec::new();
    btc_common::varint::encode_varint(redeem_script_bytes.len() as u64, &mut prefixed);
    prefixed.extend_from_slice(&redeem_script_bytes);
    let (redeem_script, _) = Script::decode(&prefixed)?;
    for command in redeem_script.commands.into_iter().rev() {
        cmds.push_front(command);
    }
    Ok(())
}

fn run_op(
    op: u8,
    stack: &mut Vec<Vec<u8>>,
    altstack: &mut Vec<Vec<u8>>,
    cmds: &mut VecDeque<Command>,
    z: &BigUint,
) -> Result<(), Error> {
    match op {
        OP_NOP => Ok(()),
        OP_0 => {
            stack.push(Vec::new());
            Ok(())
        }
        OP_1NEGATE => {
            stack.push(encode_num(-1));
            Ok(())
        }
        n if (OP_1..=OP_16).contains(&n) => {
            stack.push(encode_num((n - OP_1 + 1) as i64));
            Ok(())
        }
        OP_IF => op_if(false, stack, cmds),
        OP_NOTIF => op_if(true, stack, cmds),
        OP_VERIFY => {
            let top = pop(stack)?;
            require(is_truthy(&top), "OP_VERIFY")
        }
        OP_RETURN => Err(Error::EvaluationFailed("OP_RETURN".into())),
        OP_TOALTSTACK => {
            altstack.push(pop(stack)?);
            Ok(())
        }
        OP_FROMALTSTACK => {
            stack.push(pop(altstack)?);
            Ok(())
        }
        OP_2DROP => {
            pop(stack)?;
            pop(stack)?;
            Ok(())
        }
        OP_2DUP => {
            need(stack, 2)?;
            let n = stack.len();
            stack.push(stack[n - 2].clone());
            stack.push(stack[n - 2].clone());
            Ok(())
        }
        OP_3DUP => {
            need(stack, 3)?;
            let n = stack.len();
            stack.push(stack[n - 3].clone());
            stack.push(stack[n - 3].clone());
            stack.push(stack[n - 3].clone());
            Ok(())
        }
        OP_2OVER => {
            need(stack, 4)?;
            let n = stack.len();
            stack.push(stack[n - 4].clone());
            stack.push(stack[n - 4].clone());
            Ok(())
        }
        OP_2SWAP => {
            need(stack, 4)?;
            let n = stack.len();
            stack.swap(n - 4, n - 2);
            stack.swap(n - 3, n - 1);
            Ok(())
        }
        OP_IFDUP => {
            let top = last(stack)?.clone();
            if is_truthy(&top) {
                stack.push(top);
            }
            Ok(())
        }
        OP_DEPTH => {
            stack.push(encode_num(stack.len() as i64));
            Ok(())
        }
        OP_DROP => {
            pop(stack)?;
            Ok(())
        }
        OP_DUP => {
            let top = last(stack)?.clone();
            stack.push(top);
            Ok(())
        }
        OP_NIP => {
            need(stack, 2)?;
            let top = pop(stack)?;
            pop(stack)?;
            stack.push(top);
            Ok(())
        }
        OP_OVER => {
            need(stack, 2)?;
            let n = stack.len();
            stack.push(stack[n - 2].clone());
            Ok(())
        }
        OP_PICK => {
            let n = decode_num(&pop(stack)?) as usize;
            need(stack, n + 1)?;
            let len = stack.len();
            stack.push(stack[len - 1 - n].clone());
            Ok(())
        }
        OP_ROLL => {
            let n = decode_num(&pop(stack)?) as usize;
            need(stack, n + 1)?;
            let idx = stack.len() - 1 - n;
            let item = stack.remove(idx);
            stack.push(item);
            Ok(())
        }
        OP_ROT => {
            need(stack, 3)?;
            let n = stack.len();
            stack.swap(n - 3, n - 2);
            stack.swap(n - 2, n - 1);
            Ok(())
        }
        OP_SWAP => {
            need(stack, 2)?;
            let n = stack.len();
            stack.swap(n - 2, n - 1);
            Ok(())
        }
        OP_TUCK => {
            need(stack, 2)?;
            let top = last(stack)?.clone();
            let n = stack.len();
            stack.insert(n - 2, top);
            Ok(())
        }
        OP_SIZE => {
            let size = last(stack)?.len() as i64;
            stack.push(encode_num(size));
            Ok(())
        }
        OP_EQUAL => {
            let (a, b) = pop2(stack)?;
            stack.push(encode_num((a == b) as i64));
            Ok(())
        }
        OP_EQUALVERIFY => {
            let (a, b) = pop2(stack)?;
            require(a == b, "OP_EQUALVERIFY")
        }
        OP_1ADD => unary_num(stack, |n| n + 1),
        OP_1SUB => unary_num(stack, |n| n - 1),
        OP_NEGATE => unary_num(stack, |n| -n),
        OP_ABS => unary_num(stack, |n| n.abs()),
        OP_NOT => unary_num(stack, |n| (n == 0) as i64),
        OP_0NOTEQUAL => unary_num(stack, |n| (n != 0) as i64),
        OP_ADD => binary_num(stack, |a, b| a + b),
        OP_SUB => binary_num(stack, |a, b| a - b),
        OP_BOOLAND => binary_num(stack, |a, b| (a != 0 && b != 0) as i64),
        OP_BOOLOR => binary_num(stack, |a, b| (a != 0 || b != 0) as i64),
        OP_NUMEQUAL => binary_num(stack, |a, b| (a == b) as i64),
        OP_NUMEQUALVERIFY => {
            let (a, b) = pop2_num(stack)?;
            require(a == b, "OP_NUMEQUALVERIFY")
        }
        OP_NUMNOTEQUAL => binary_num(stack, |a, b| (a != b) as i64),
        OP_LESSTHAN => binary_num(stack, |a, b| (a < b) as i64),
        OP_GREATERTHAN => binary_num(stack, |a, b| (a > b) as i64),
        OP_LESSTHANOREQUAL => binary_num(stack, |a, b| (a <= b) as i64),
        OP_GREATERTHANOREQUAL => binary_num(stack, |a, b| (a >= b) as i64),
        OP_MIN => binary_num(stack, |a, b| a.min(b)),
        OP_MAX => binary_num(stack, |a, b| a.max(b)),
        OP_WITHIN => {
            let max = decode_num(&pop(stack)?);
            let min = decode_num(&pop(stack)?);
            let x = decode_num(&pop(stack)?);
            stack.push(encode_num((min <= x && x < max) as i64));
            Ok(())
        }
        OP_RIPEMD160 => unary_hash(stack, |data| Ripemd160::digest(data).to_vec()),
        OP_SHA1 => unary_hash(stack, |data| Sha1::digest(data).to_vec()),
        OP_SHA256 => unary_hash(stack, |data| Sha256::digest(data).to_vec()),
        OP_HASH160 => unary_hash(stack, |data| hash160(data).to_vec()),
        OP_HASH256 => unary_hash(stack, |data| hash256(data).to_vec()),
        OP_CODESEPARATOR => Ok(()),
        OP_CHECKSIG => op_checksig(stack, z),
        OP_CHECKSIGVERIFY => {
            op_checksig(stack, z)?;
            let top = pop(stack)?;
            require(is_truthy(&top), "OP_CHECKSIGVERIFY")
        }
        OP_CHECKMULTISIG => op_checkmultisig(stack, z),
        OP_CHECKMULTISIGVERIFY => {
            op_checkmultisig(stack, z)?;
            let top = pop(stack)?;
            require(is_truthy(&top), "OP_CHECKMULTISIGVERIFY")
        }
        _ => Err(Error::EvaluationFailed(format!("unsupported opcode 0x{op:02x}"))),
    }
}

fn op_if(negated: bool, stack: &mut Vec<Vec<u8>>, cmds: &mut VecDeque<Command>) -> Result<(), Error> {
    let condition_elem = pop(stack)?;
    let mut true_branch = Vec::new();
    let mut false_branch = Vec::new();
    let mut in_true_branch = true;
    let mut depth = 1;
    let mut found_endif = false;

    while let Some(item) = cmds.pop_front() {
        match &item {
            Command::Op(op) if *op == OP_IF || *op == OP_NOTIF => {
                depth += 1;
                push_to(in_true_branch, &mut true_branch, &mut false_branch, item);
            }
            Command::Op(op) if *op == OP_ELSE && depth == 1 => {
                in_true_branch = false;
            }
            Command::Op(op) if *op == OP_ENDIF => {
                if depth == 1 {
                    found_endif = true;
                    break;
                }
                depth -= 1;
                push_to(in_true_branch, &mut true_branch, &mut false_branch, item);
            }
            _ => push_to(in_true_branch, &mut true_branch, &mut false_branch, item),
        }
    }
    if !found_endif {
        return Err(Error::EvaluationFailed("OP_IF/OP_NOTIF without matching OP_ENDIF".into()));
    }

    let mut condition = is_truthy(&condition_elem);
    if negated {
        condition = !condition;
    }
    let chosen = if condition { true_branch } else { false_branch };
    for command in chosen.into_iter().rev() {
        cmds.push_front(command);
    }
    Ok(())
}

fn push_to(in_true_branch: bool, true_branch: &mut Vec<Command>, false_branch: &mut Vec<Command>, item: Command) {
    if in_true_branch {
        true_branch.push(item);
    } else {
        false_branch.push(item);
    }
}

fn op_checksig(stack: &mut Vec<Vec<u8>>, z: &BigUint) -> Result<(), Error> {
    let sec_pubkey = pop(stack)?;
    let der_sig = pop(stack)?;
    let der_sig = der_sig.strip_suffix(&[0x01]).unwrap_or(&der_sig);
    let result = (|| -> Result<bool, Error> {
        let point = sec::parse(&sec_pubkey)?;
        let sig = Signature::parse_der(der_sig)?;
        Ok(ecdsa::verify(&point, z, &sig))
    })()
    .unwrap_or(false);
    stack.push(encode_num(result as i64));
    Ok(())
}

fn op_checkmultisig(stack: &mut Vec<Vec<u8>>, z: &BigUint) -> Result<(), Error> {
    let n = decode_num(&pop(stack)?);
    if !(0..=20).contains(&n) {
        return Err(Error::EvaluationFailed("OP_CHECKMULTISIG pubkey count out of range".into()));
    }
    let mut pubkeys = Vec::with_capacity(n as usize);
    for _ in 0..n {
        pubkeys.push(pop(stack)?);
    }
    let m = decode_num(&pop(stack)?);
    if !(0..=n).contains(&m) {
        return Err(Error::EvaluationFailed("OP_CHECKMULTISIG signature count out of range".into()));
    }
    let mut sigs = Vec::with_capacity(m as usize);
    for _ in 0..m {
        sigs.push(pop(stack)?);
    }
    // Historical off-by-one bug in the reference client: an extra item is
    // consumed and ignored.
    pop(stack)?;

    let mut pubkey_iter = pubkeys.into_iter();
    let mut all_matched = true;
    for sig in &sigs {
        let der = sig.strip_suffix(&[0x01]).unwrap_or(sig.as_slice());
        let mut matched = false;
        for pubkey in pubkey_iter.by_ref() {
            let ok = (|| -> Result<bool, Error> {
                let point = sec::parse(&pubkey)?;
                let signature = Signature::parse_der(der)?;
                Ok(ecdsa::verify(&point, z, &signature))
            })()
            .unwrap_or(false);
            if ok {
                matched = true;
                break;
            }
        }
        if !matched {
            all_matched = false;
            break;
        }
    }
    stack.push(encode_num(all_matched as i64));
    Ok(())
}

fn unary_num(stack: &mut Vec<Vec<u8>>, f: impl Fn(i64) -> i64) -> Result<(), Error> {
    let a = decode_num(&pop(stack)?);
    stack.push(encode_num(f(a)));
    Ok(())
}

fn binary_num(stack: &mut Vec<Vec<u8>>, f: impl Fn(i64, i64) -> i64) -> Result<(), Error> {
    let (a, b) = pop2_num(stack)?;
    stack.push(encode_num(f(a, b)));
    Ok(())
}

fn unary_hash(stack: &mut Vec<Vec<u8>>, f: impl Fn(&[u8]) -> Vec<u8>) -> Result<(), Error> {
    let data = pop(stack)?;
    stack.push(f(&data));
    Ok(())
}

fn pop(stack: &mut Vec<Vec<u8>>) -> Result<Vec<u8>, Error> {
    stack.pop().ok_or_else(|| Error::EvaluationFailed("stack underflow".into()))
}

fn last(stack: &[Vec<u8>]) -> Result<&Vec<u8>, Error> {
    stack.last().ok_or_else(|| Error::EvaluationFailed("stack underflow".into()))
}

fn need(stack: &[Vec<u8>], n: usize) -> Result<(), Error> {
    if stack.len() < n {
        return Err(Error::EvaluationFailed("stack underflow".into()));
    }
    Ok(())
}

fn pop2(stack: &mut Vec<Vec<u8>>) -> Result<(Vec<u8>, Vec<u8>), Error> {
    let b = pop(stack)?;
    let a = pop(stack)?;
    Ok((a, b))
}

fn pop2_num(stack: &mut Vec<Vec<u8>>) -> Result<(i64, i64), Error> {
    let (a, b) = pop2(stack)?;
    Ok((decode_num(&a), decode_num(&b)))
}

fn require(condition: bool, opcode_name: &str) -> Result<(), Error> {
    if condition {
        Ok(())
    } else {
        Err(Error::EvaluationFailed(format!("{opcode_name} check failed")))
    }
}
