use crate::common::*;
use crate::parse::ast;

pub trait AstVisitor {
    type Output;

    fn visit<T: ?Sized>(&mut self, node: &T) -> Self::Output
    where
        T: Accept<Self>,
    {
        node.accept(self)
    }

    fn visit_number(&mut self, x: Int) -> Self::Output;

    fn visit_dice(&mut self, term: &ast::DiceTerm) -> Self::Output;

    fn visit_unary(&mut self, op: UnaryOperator, operand: &ast::Node) -> Self::Output;

    fn visit_binary(&mut self, l: &ast::Node, op: BinaryOperator, r: &ast::Node) -> Self::Output;
}

pub trait Accept<V: AstVisitor + ?Sized> {
    fn accept(&self, v: &mut V) -> V::Output;
}

impl<V: AstVisitor + ?Sized> Accept<V> for ast::Node {
    fn accept(&self, v: &mut V) -> V::Output {
        match self {
            Self::Number(x) => v.visit_number(*x),
            Self::Dice(term) => v.visit_dice(term),
            Self::Unary(op, x) => v.visit_unary(*op, x),
            Self::Binary(l, op, r) => v.visit_binary(l, *op, r),
        }
    }
}
