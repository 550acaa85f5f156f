#![allow(dead_code)]

use std::{cell::Cell, rc::Rc};

use inmet_array::{
    data::types::type_tag::{lookup, TypeTag},
    error::{AllocationError, ArrayResult},
    foreign::{
        descriptor::ArrayDescriptor,
        host::{HostAllocator, HostArray},
    },
    memory::release::Release,
};

// Keeps track of the arrays a mock host has handed out.
#[derive(Default, Debug)]
pub struct Counters {
    pub allocated: Cell<usize>,
    pub released: Cell<usize>,
}

impl Counters {
    pub fn live(&self) -> usize {
        self.allocated.get() - self.released.get()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Behavior {
    Normal,
    Fail,
    WrongShape,
    WrongTag,
}

// A host that allocates zeroed, row-major arrays and counts how often they're released.
pub struct MockHost {
    pub counters: Rc<Counters>,
    behavior: Behavior,
}

impl MockHost {
    pub fn new() -> Self {
        Self::with_behavior(Behavior::Normal)
    }

    pub fn with_behavior(behavior: Behavior) -> Self {
        MockHost {
            counters: Rc::default(),
            behavior,
        }
    }
}

impl HostAllocator for MockHost {
    type Array = MockArray;

    fn allocate(&self, shape: &[usize], tag: TypeTag) -> ArrayResult<MockArray> {
        if self.behavior == Behavior::Fail {
            Err(AllocationError::Host {
                element_type: tag.name(),
                shape: shape.into(),
                reason: "out of host memory".into(),
            })?;
        }

        let mut shape = shape.to_vec();
        if self.behavior == Behavior::WrongShape {
            shape.reverse();
            shape.push(1);
        }

        let tag = match (self.behavior, tag) {
            (Behavior::WrongTag, TypeTag::U8) => TypeTag::I8,
            (Behavior::WrongTag, _) => TypeTag::U8,
            _ => tag,
        };

        let element_size = lookup(tag).size;
        let byte_strides = row_major_byte_strides(&shape, element_size);
        let bytes = shape.iter().product::<usize>() * element_size;

        self.counters.allocated.set(self.counters.allocated.get() + 1);
        Ok(MockArray {
            data: vec![0; (bytes + 7) / 8],
            shape,
            byte_strides,
            tag,
            counters: self.counters.clone(),
            refcount: 1,
        })
    }
}

// An array owned by the mock host. The data is stored as u64s so it's aligned for every element
// type.
#[derive(Debug)]
pub struct MockArray {
    data: Vec<u64>,
    shape: Vec<usize>,
    byte_strides: Vec<isize>,
    tag: TypeTag,
    counters: Rc<Counters>,
    pub refcount: usize,
}

impl MockArray {
    pub fn bytes(&self) -> &[u64] {
        &self.data
    }
}

unsafe impl HostArray for MockArray {
    fn descriptor(&mut self) -> ArrayDescriptor<'_> {
        assert!(self.refcount > 0, "used a released array");
        unsafe {
            ArrayDescriptor::new(
                &self.shape,
                &self.byte_strides,
                lookup(self.tag).size,
                self.data.as_mut_ptr().cast(),
                self.tag,
            )
        }
    }
}

impl Release for MockArray {
    unsafe fn release(&mut self) {
        assert!(self.refcount > 0, "released twice");
        self.refcount -= 1;
        self.counters.released.set(self.counters.released.get() + 1);
    }
}

pub fn row_major_byte_strides(shape: &[usize], element_size: usize) -> Vec<isize> {
    let mut strides = vec![0isize; shape.len()];
    let mut acc = element_size as isize;
    for (stride, &n) in strides.iter_mut().zip(shape).rev() {
        *stride = acc;
        acc *= n as isize;
    }
    strides
}

pub fn column_major_byte_strides(shape: &[usize], element_size: usize) -> Vec<isize> {
    let mut strides = vec![0isize; shape.len()];
    let mut acc = element_size as isize;
    for (stride, &n) in strides.iter_mut().zip(shape) {
        *stride = acc;
        acc *= n as isize;
    }
    strides
}
