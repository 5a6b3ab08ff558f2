use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    ast::{
        symbols::{Func, OverloadFunc, Scope, Symbol},
        types::{Named, Type},
    },
    errors::errors::{Error, ErrorImpl},
    MK_ERROR,
};

lazy_static! {
    static ref OVERLOAD_NAME: Regex = Regex::new(r"^(.+)__(.)$").unwrap();
}

/// Splits `name__c` into `name` and the index character `c`.
pub fn split_overload_name(name: &str) -> Option<(&str, char)> {
    let captures = OVERLOAD_NAME.captures(name)?;
    let base = captures.get(1)?.as_str();
    let index = captures.get(2)?.as_str().chars().next()?;
    Some((base, index))
}

/// Index of an overload variant: `0`-`9` then `a`-`z`.
fn to_index(c: char) -> Option<usize> {
    if c.is_ascii_digit() || c.is_ascii_lowercase() {
        c.to_digit(36).map(|d| d as usize)
    } else {
        None
    }
}

/// Groups the overload variants declared in `scope` into overload sets.
///
/// Functions become an overloaded function inserted into `scope`, methods an
/// overloaded method on their receiver type. The indices of a set must run
/// from 0 to its size minus one without gaps.
pub fn init_overloads(scope: &Scope) -> Result<(), Error> {
    let mut funcs: BTreeMap<String, Vec<Func>> = BTreeMap::new();
    let mut methods: Vec<(Named, BTreeMap<String, Vec<Func>>)> = vec![];

    for name in scope.names() {
        match scope.lookup(&name) {
            Some(Symbol::Func(func)) => {
                if let Some((base, _)) = split_overload_name(&name) {
                    funcs.entry(base.to_string()).or_default().push(func);
                }
            }
            Some(Symbol::TypeName(tn)) => {
                let Type::Named(named) = &tn.ty else {
                    continue;
                };
                let mut groups: BTreeMap<String, Vec<Func>> = BTreeMap::new();
                for method in named.methods().iter() {
                    if let Some((base, _)) = split_overload_name(method.name()) {
                        groups.entry(base.to_string()).or_default().push(method.clone());
                    }
                }
                if !groups.is_empty() {
                    methods.push((named.clone(), groups));
                }
            }
            _ => (),
        }
    }

    for (base, items) in funcs {
        let overload = OverloadFunc::new(base.clone(), order_variants(items)?);
        if scope.insert(Symbol::Overload(overload)).is_some() {
            return MK_ERROR!(ErrorImpl::AlreadyDeclared { name: base }, "InitOverloads");
        }
    }
    for (named, groups) in methods {
        for (base, items) in groups {
            if named.method(&base).is_some() {
                return MK_ERROR!(
                    ErrorImpl::AlreadyDeclared {
                        name: format!("{}.{}", named.name(), base)
                    },
                    "InitOverloads"
                );
            }
            named.add_overload(OverloadFunc::new(base, order_variants(items)?));
        }
    }
    Ok(())
}

fn order_variants(items: Vec<Func>) -> Result<Vec<Func>, Error> {
    let count = items.len();
    let mut slots: Vec<Option<Func>> = vec![None; count];

    for item in items {
        let index = split_overload_name(item.name()).and_then(|(_, c)| to_index(c));
        let Some(index) = index else {
            return invalid(&item, "index must be one of [0-9a-z]".to_string());
        };
        if index >= count {
            return invalid(
                &item,
                format!("overload indices must run from 0 to {}", count - 1),
            );
        }
        if slots[index].is_some() {
            return invalid(&item, format!("index {} is used twice", index));
        }
        slots[index] = Some(item);
    }

    Ok(slots.into_iter().flatten().collect())
}

fn invalid<T>(item: &Func, reason: String) -> Result<T, Error> {
    MK_ERROR!(
        ErrorImpl::InvalidOverload {
            name: item.name().to_string(),
            reason
        },
        "InitOverloads"
    )
}
