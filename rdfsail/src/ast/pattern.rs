// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Graph pattern structures
//!
//! A [`GraphPattern`] is one scope of a query: an ordered list of pattern
//! nodes plus the conjunctive constraints that filter them. Optional groups
//! are nodes that carry a nested scope, evaluated as a left outer join.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::constraint::Constraint;
use super::term::Term;

/// A position in a pattern: either a named variable or a constant term
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatternTerm {
    Var(String),
    Const(Term),
}

impl PatternTerm {
    pub fn var(name: impl Into<String>) -> Self {
        PatternTerm::Var(name.into())
    }

    pub fn constant(term: Term) -> Self {
        PatternTerm::Const(term)
    }

    pub fn as_var(&self) -> Option<&str> {
        match self {
            PatternTerm::Var(name) => Some(name),
            PatternTerm::Const(_) => None,
        }
    }

    pub fn as_const(&self) -> Option<&Term> {
        match self {
            PatternTerm::Const(term) => Some(term),
            PatternTerm::Var(_) => None,
        }
    }
}

impl From<Term> for PatternTerm {
    fn from(term: Term) -> Self {
        PatternTerm::Const(term)
    }
}

impl fmt::Display for PatternTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternTerm::Var(name) => write!(f, "?{}", name),
            PatternTerm::Const(term) => write!(f, "{}", term),
        }
    }
}

/// A subject/predicate/object template
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TriplePattern {
    pub subject: PatternTerm,
    pub predicate: PatternTerm,
    pub object: PatternTerm,
}

impl TriplePattern {
    pub fn new(subject: PatternTerm, predicate: PatternTerm, object: PatternTerm) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }

    pub fn positions(&self) -> [&PatternTerm; 3] {
        [&self.subject, &self.predicate, &self.object]
    }

    pub fn variables(&self) -> BTreeSet<String> {
        let mut vars = BTreeSet::new();
        self.collect_variables(&mut vars);
        vars
    }

    fn collect_variables(&self, vars: &mut BTreeSet<String>) {
        for position in self.positions() {
            if let Some(name) = position.as_var() {
                vars.insert(name.to_string());
            }
        }
    }
}

impl fmt::Display for TriplePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {} {})", self.subject, self.predicate, self.object)
    }
}

/// Kinds of direct-membership patterns.
///
/// These only match the *direct* (non-transitive) relationship, which the
/// store cannot answer with a plain range count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MembershipKind {
    DirectType,
    DirectSubClassOf,
    DirectSubPropertyOf,
}

impl MembershipKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipKind::DirectType => "directType",
            MembershipKind::DirectSubClassOf => "directSubClassOf",
            MembershipKind::DirectSubPropertyOf => "directSubPropertyOf",
        }
    }
}

/// A direct-membership pattern such as `directSubClassOf(?sub, ?super)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MembershipPattern {
    pub kind: MembershipKind,
    pub subject: PatternTerm,
    pub object: PatternTerm,
}

impl MembershipPattern {
    pub fn new(kind: MembershipKind, subject: PatternTerm, object: PatternTerm) -> Self {
        Self {
            kind,
            subject,
            object,
        }
    }

    pub fn variables(&self) -> BTreeSet<String> {
        [&self.subject, &self.object]
            .into_iter()
            .filter_map(|position| position.as_var().map(str::to_string))
            .collect()
    }
}

impl fmt::Display for MembershipPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}, {})", self.kind.as_str(), self.subject, self.object)
    }
}

/// One conjunct of a graph pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PatternNode {
    Triple(TriplePattern),
    Membership(MembershipPattern),
    /// A nested scope evaluated as a left outer join
    Optional(GraphPattern),
}

impl PatternNode {
    /// Every variable the node references, including those of nested scopes
    pub fn variables(&self) -> BTreeSet<String> {
        match self {
            PatternNode::Triple(triple) => triple.variables(),
            PatternNode::Membership(membership) => membership.variables(),
            PatternNode::Optional(group) => group.variables(),
        }
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, PatternNode::Optional(_))
    }
}

impl From<TriplePattern> for PatternNode {
    fn from(triple: TriplePattern) -> Self {
        PatternNode::Triple(triple)
    }
}

impl From<MembershipPattern> for PatternNode {
    fn from(membership: MembershipPattern) -> Self {
        PatternNode::Membership(membership)
    }
}

/// One scope of a query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphPattern {
    /// Pattern conjuncts in their original order
    pub nodes: Vec<PatternNode>,
    /// Conjunctive constraints local to this scope
    pub constraints: Vec<Constraint>,
}

impl GraphPattern {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: append a triple pattern
    pub fn triple(
        mut self,
        subject: impl Into<PatternTerm>,
        predicate: impl Into<PatternTerm>,
        object: impl Into<PatternTerm>,
    ) -> Self {
        self.nodes.push(PatternNode::Triple(TriplePattern::new(
            subject.into(),
            predicate.into(),
            object.into(),
        )));
        self
    }

    /// Builder: append a direct-membership pattern
    pub fn membership(
        mut self,
        kind: MembershipKind,
        subject: impl Into<PatternTerm>,
        object: impl Into<PatternTerm>,
    ) -> Self {
        self.nodes.push(PatternNode::Membership(MembershipPattern::new(
            kind,
            subject.into(),
            object.into(),
        )));
        self
    }

    /// Builder: append an optional child scope
    pub fn optional(mut self, group: GraphPattern) -> Self {
        self.nodes.push(PatternNode::Optional(group));
        self
    }

    /// Builder: add a constraint
    pub fn filter(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn push(&mut self, node: PatternNode) {
        self.nodes.push(node);
    }

    /// Variables referenced by the non-optional nodes of this scope
    pub fn local_variables(&self) -> BTreeSet<String> {
        self.nodes
            .iter()
            .filter(|node| !node.is_optional())
            .flat_map(PatternNode::variables)
            .collect()
    }

    /// Variables referenced anywhere inside the optional children
    pub fn optional_variables(&self) -> BTreeSet<String> {
        self.optionals().flat_map(GraphPattern::variables).collect()
    }

    /// Variables referenced by any node of this scope or its descendants
    pub fn variables(&self) -> BTreeSet<String> {
        self.nodes.iter().flat_map(PatternNode::variables).collect()
    }

    pub fn optionals(&self) -> impl Iterator<Item = &GraphPattern> {
        self.nodes.iter().filter_map(|node| match node {
            PatternNode::Optional(group) => Some(group),
            _ => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.constraints.is_empty()
    }
}

/// Binary operators composing two queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetOperator {
    Union,
    Intersection,
    Difference,
}

impl fmt::Display for SetOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SetOperator::Union => "UNION",
            SetOperator::Intersection => "INTERSECT",
            SetOperator::Difference => "MINUS",
        };
        write!(f, "{}", name)
    }
}

/// A query: a single graph pattern or a set operation over two queries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Query {
    Pattern(GraphPattern),
    SetOperation {
        operator: SetOperator,
        left: Box<Query>,
        right: Box<Query>,
    },
}

impl Query {
    pub fn set_operation(operator: SetOperator, left: Query, right: Query) -> Self {
        Query::SetOperation {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

impl From<GraphPattern> for Query {
    fn from(pattern: GraphPattern) -> Self {
        Query::Pattern(pattern)
    }
}
